//! Lane Hopper entry point
//!
//! The browser build starts from `lane_hopper::wasm`. Natively this runs
//! headless autopilot games and logs how they end, which is a quick way to
//! smoke-test balance changes: `RUST_LOG=info lane-hopper [runs] [seed] [tuning.json]`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use lane_hopper::audio::{CueSink, LogSink, SoundEffect};
    use lane_hopper::consts::NOMINAL_FRAME_MS;
    use lane_hopper::session::{RunRequest, Session};
    use lane_hopper::sim::TickInput;
    use lane_hopper::{HighScores, Profile, ScoreStore, Tuning, Wallet};

    env_logger::init();
    log::info!("Lane Hopper (native) starting...");

    let mut args = std::env::args().skip(1);
    let runs: u32 = args.next().and_then(|a| a.parse().ok()).unwrap_or(5);
    let seed: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(1);
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("Cannot use tuning from {}: {}", path, err);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    struct Counting {
        log: LogSink,
        cues: u32,
    }
    impl CueSink for Counting {
        fn cue(&mut self, effect: SoundEffect) {
            self.cues += 1;
            self.log.cue(effect);
        }
    }

    let mut session = Session::new(Profile::new(), HighScores::new(), tuning);
    let mut sink = Counting {
        log: LogSink,
        cues: 0,
    };
    let demo = TickInput {
        autopilot: true,
        ..Default::default()
    };
    // Ten simulated minutes is plenty for one autopilot run
    let frame_limit = 36_000;

    for run in 0..runs {
        let request = if run % 2 == 0 {
            RunRequest::Classic
        } else {
            RunRequest::Survival
        };
        if let Err(err) = session.start_run(request, seed + run as u64) {
            log::error!("Run {} not started: {}", run, err);
            continue;
        }
        let mut frames = 0;
        while session.is_running() && frames < frame_limit {
            session.tick(&demo, NOMINAL_FRAME_MS, &mut sink);
            frames += 1;
        }
        if let Ok(coins) = session.convert_score() {
            log::info!("Converted {} into coins", coins);
        }
        if let Some(state) = session.state() {
            println!(
                "run {:>2} {:<9} score {:>4} coins {:>3} {:>6.1}s {:?}",
                run,
                state.mode.mode().as_str(),
                state.score(),
                state.coins_collected,
                state.run_time,
                state.outcome
            );
        }
    }

    println!(
        "wallet {} | classic best {} | survival best {} | {} cues",
        session.wallet().balance(),
        session.scores().high_score(lane_hopper::sim::GameMode::Classic),
        session.scores().high_score(lane_hopper::sim::GameMode::Survival),
        sink.cues
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is lane_hopper::wasm::wasm_main, this is just to satisfy the compiler
}
