use crate::infra::{build_engine, parse_bundle};
use clap::Args;
use jobfiltr_ml::config::AppConfig;
use jobfiltr_ml::error::AppError;
use jobfiltr_ml::scoring::PredictionResult;
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file holding a prediction request or a bare feature bundle
    #[arg(long)]
    pub(crate) features: PathBuf,
    /// Pretty-print the prediction payload
    #[arg(long)]
    pub(crate) pretty: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs { features, pretty } = args;

    let config = AppConfig::load()?;
    let raw = std::fs::read_to_string(&features)?;
    let bundle = parse_bundle(&raw)?;

    let engine = build_engine(&config.scoring);
    let result = engine.predict(&bundle)?;

    eprint!("{}", render_prediction(&result));
    let payload = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{payload}");

    Ok(())
}

/// Human-readable summary. Written to stderr so stdout carries only the JSON
/// payload.
fn render_prediction(result: &PredictionResult) -> String {
    let mut report = format!("Posting risk assessment ({})\n", result.model_version);
    let _ = writeln!(
        report,
        "- Scam risk: {:.1}% ({})",
        result.scam_probability * 100.0,
        result.scam_risk()
    );
    let _ = writeln!(
        report,
        "- Ghost job risk: {:.1}% ({})",
        result.ghost_probability * 100.0,
        result.ghost_risk()
    );
    let _ = writeln!(report, "- Model confidence: {:.1}%", result.confidence * 100.0);

    report.push_str("Sub-model scores\n");
    let scores = &result.model_scores;
    for (label, value) in [
        ("Transformer", scores.transformer),
        ("Gradient boosting", scores.xgboost),
        ("Anomaly detection", scores.anomaly),
        ("Language model", scores.llm),
    ] {
        match value {
            Some(value) => {
                let _ = writeln!(report, "- {label}: {:.1}%", value * 100.0);
            }
            None => {
                let _ = writeln!(report, "- {label}: unavailable");
            }
        }
    }

    if result.feature_importance.is_empty() {
        report.push_str("Contributing signals: none\n");
    } else {
        report.push_str("Contributing signals\n");
        for entry in &result.feature_importance {
            let _ = writeln!(report, "- {}: {:.3}", entry.feature, entry.importance);
        }
    }
    let _ = writeln!(report, "Scored in {:.2} ms", result.inference_time);
    report
}
