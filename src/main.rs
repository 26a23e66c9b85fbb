//! # Vistoria Report CLI
//!
//! Layout inspector for report data: runs the engine against a recording
//! surface and writes the placement trace as JSON, without needing a
//! real document backend.
//!
//! Usage:
//!   vistoria-report input.json -o trace.json
//!   echo '{ ... }' | vistoria-report -o trace.json
//!   vistoria-report --example > report.json

use std::env;
use std::fs;
use std::io::{self, Read};

use vistoria_report::model::{ActivityKind, ActivityRecord, PhotoRecord, ReportData};
use vistoria_report::{generate_report_json, RecordingSurface};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vistoria_report=info".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print!("{}", example_report_json());
        return;
    }

    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1]).expect("Failed to read input file")
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).expect("Failed to read stdin");
        buf
    };

    let output_path = args
        .windows(2)
        .find(|w| w[0] == "-o")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| "layout_trace.json".to_string());

    let mut surface = RecordingSurface::new();
    match generate_report_json(&input, &mut surface).await {
        Ok(summary) => {
            let trace = serde_json::json!({
                "summary": &summary,
                "pages": surface.pages(),
            });
            let pretty = serde_json::to_string_pretty(&trace).expect("trace serialization");
            fs::write(&output_path, &pretty).expect("Failed to write trace");
            eprintln!(
                "✓ {} pages, {} placeholders → {} (document name: {})",
                summary.page_count, summary.placeholder_count, output_path, summary.file_name
            );
        }
        Err(e) => {
            eprintln!("✗ Report generation failed: {e}");
            std::process::exit(1);
        }
    }
}

fn example_report_json() -> String {
    use chrono::TimeZone;
    let created = chrono::Utc.with_ymd_and_hms(2026, 8, 12, 14, 30, 0).unwrap();

    let photo = |label: &str, order: Option<u32>| PhotoRecord {
        label: label.to_string(),
        url: format!("https://storage.example.com/vistorias/{}.jpg", label.to_lowercase()),
        order,
        intrinsic_width: Some(1600),
        intrinsic_height: Some(1200),
    };

    let data = ReportData {
        plate: Some("ABC1D23".to_string()),
        model: Some("Fiat Argo 1.3".to_string()),
        year: Some("2022".to_string()),
        status: Some("Aprovada".to_string()),
        inspection_kind: Some("Cautelar completa".to_string()),
        notes: Some("Veículo sem avarias aparentes. Pintura original.".to_string()),
        author: Some("M. Ribeiro".to_string()),
        created_at: Some(created),
        photos: vec![
            photo("Frente", Some(1)),
            photo("Traseira", Some(2)),
            photo("Lateral-Esquerda", Some(3)),
            photo("Lateral-Direita", Some(4)),
            photo("Motor", None),
        ],
        activities: vec![ActivityRecord {
            kind: ActivityKind::Guided,
            created_at: created,
            notes: Some("Etapa guiada de documentação.".to_string()),
            photos: vec![photo("Chassi", None), photo("Hodometro", None)],
        }],
    };
    let mut json = serde_json::to_string_pretty(&data).expect("example serialization");
    json.push('\n');
    json
}
