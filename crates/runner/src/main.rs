use chrono::Utc;
use nemesis_chaos::FlashCrashSynthesizer;
use nemesis_core::Candle;
use nemesis_runner::{InvestigationDelegator, RecordedContext, Result, RunnerError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::env;
use std::process::ExitCode;
use std::str::FromStr;

const USAGE: &str = "usage:
  nemesis investigate <evidence.csv> <context.json>
  nemesis synthesize <open_price> [seed]";

fn main() -> ExitCode {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<()> {
    match args.get(1).map(String::as_str) {
        Some("investigate") => {
            let [evidence, context] = [args.get(2), args.get(3)].map(|a| {
                a.cloned()
                    .ok_or_else(|| RunnerError::InvalidArguments(USAGE.to_string()))
            });
            let context = RecordedContext::from_json_path(context?)?;
            let delegator = InvestigationDelegator::new(context);
            let report = delegator.run(evidence?)?;
            println!("{}", report.render());
            Ok(())
        }
        Some("synthesize") => {
            let open = args
                .get(2)
                .and_then(|raw| Decimal::from_str(raw).ok())
                .ok_or_else(|| RunnerError::InvalidArguments(USAGE.to_string()))?;
            let seed = args
                .get(3)
                .and_then(|raw| raw.parse::<u64>().ok())
                .unwrap_or(0);

            // A flat interval at the requested price is all the synthesizer
            // needs; everything but the open gets rewritten anyway.
            let interval = Candle::new(Utc::now(), open, open, open, open, dec!(100));
            let mut synthesizer = FlashCrashSynthesizer::with_seed(seed);
            let injection = synthesizer.inject_crash(&interval)?;

            println!("{}", serde_json::to_string_pretty(&injection.candle)?);
            Ok(())
        }
        _ => Err(RunnerError::InvalidArguments(USAGE.to_string())),
    }
}
