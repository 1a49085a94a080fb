use std::io::Read;

use go_board::Board;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "go_board=info,seki_score=info".into()),
        )
        .init();

    let mut path = None;
    let mut json = false;
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            json = true;
        } else {
            path = Some(arg);
        }
    }

    let layout = match &path {
        Some(p) => std::fs::read_to_string(p).expect("Failed to read board file"),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .expect("Failed to read board from stdin");
            buf
        }
    };

    let komi: f64 = std::env::var("KOMI")
        .ok()
        .and_then(|k| k.parse().ok())
        .unwrap_or(6.5);

    let mut board: Board = match layout.parse() {
        Ok(b) => b,
        Err(e) => {
            tracing::error!("Invalid board: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(
        "Scoring {}x{} board, komi {komi}",
        board.cols(),
        board.rows()
    );

    board.set_scoring(true);
    let territory = board.territory();

    if json {
        let points = board.scoring_points();
        println!(
            "{}",
            serde_json::json!({
                "territory": territory,
                "result": territory.result(komi),
                "points": points,
            })
        );
        return;
    }

    print!("{board}");
    println!("Black: {}", territory.black);
    println!("White: {} + {komi}", territory.white);
    println!("Result: {}", territory.result(komi));
}
