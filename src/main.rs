// pricecard-pdf: Generate price-card sheets from spreadsheet rows

use clap::{Parser, ValueEnum};
use pricecard_pdf::surface::DrawOp;
use pricecard_pdf::{
    compose, compose_onto, input, AppError, Audience, GridSize, PriceRule, RecordingSurface,
    Template,
};
use serde::Serialize;
use std::path::PathBuf;

// ============================================================================
// Data Structures
// ============================================================================

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Generate price-card sheets with QR codes and JAN barcodes")]
struct Args {
    /// Input rows (.xlsx, .xls, .ods, .csv or .json)
    input: PathBuf,

    /// Who the cards are for
    #[arg(short, long, value_enum, default_value_t = AudienceArg::Business)]
    audience: AudienceArg,

    /// Cards per A4 sheet
    #[arg(short, long, value_enum, default_value_t = SheetArg::Eighteen)]
    sheet: SheetArg,

    /// How the price column is printed
    #[arg(short, long, value_enum, default_value_t = PriceRuleArg::Raw)]
    price_rule: PriceRuleArg,

    /// Fixed label printed on every card instead of the company/tag column
    #[arg(short, long)]
    label: Option<String>,

    /// TrueType/OpenType font able to render Japanese (e.g. NotoSansJP-Regular.ttf)
    #[arg(short, long, env = "PRICECARD_FONT")]
    font: Option<PathBuf>,

    /// Output filename (defaults to output_to{B|C}_{first label}_{sheet}.pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Lay out the cards and report pages without writing a PDF
    #[arg(long)]
    dry_run: bool,

    /// With --dry-run, print the template and every drawing operation as JSON
    #[arg(long, requires = "dry_run")]
    json: bool,
}

/// Dry-run output for --json
#[derive(Debug, Serialize)]
struct LayoutDump<'a> {
    template: &'a Template,
    pages: u32,
    labels: &'a [String],
    ops: &'a [DrawOp],
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum AudienceArg {
    Business,
    Consumer,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SheetArg {
    #[value(name = "18")]
    Eighteen,
    #[value(name = "24")]
    TwentyFour,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PriceRuleArg {
    Raw,
    TaxInclusive,
    OpenPrice,
}

impl From<AudienceArg> for Audience {
    fn from(arg: AudienceArg) -> Self {
        match arg {
            AudienceArg::Business => Audience::Business,
            AudienceArg::Consumer => Audience::Consumer,
        }
    }
}

impl From<SheetArg> for GridSize {
    fn from(arg: SheetArg) -> Self {
        match arg {
            SheetArg::Eighteen => GridSize::Eighteen,
            SheetArg::TwentyFour => GridSize::TwentyFour,
        }
    }
}

impl From<PriceRuleArg> for PriceRule {
    fn from(arg: PriceRuleArg) -> Self {
        match arg {
            PriceRuleArg::Raw => PriceRule::Raw,
            PriceRuleArg::TaxInclusive => PriceRule::TaxInclusive,
            PriceRuleArg::OpenPrice => PriceRule::OpenPrice,
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let args = Args::parse();

    let mut template = Template::new(
        args.audience.into(),
        args.sheet.into(),
        args.price_rule.into(),
    );
    if let Some(label) = args.label {
        template = template.with_fixed_label(label);
    }

    let records = input::load_records(&args.input)?;

    if args.dry_run {
        let mut surface = RecordingSurface::new();
        let layout = compose_onto(&records, &template, &mut surface)?;

        if args.json {
            let dump = LayoutDump {
                template: &template,
                pages: layout.pages,
                labels: &layout.labels,
                ops: &surface.ops,
            };
            println!("{}", serde_json::to_string_pretty(&dump)?);
            return Ok(());
        }

        let per_page = template.grid_tag() as usize;
        println!("✓ Laid out {} cards with {}", layout.labels.len(), template.name);
        for page in 0..layout.pages as usize {
            let on_page = layout.labels.len().saturating_sub(page * per_page).min(per_page);
            println!("  Page {}: {} cards", page + 1, on_page);
        }
        return Ok(());
    }

    let font = load_font(&args.font)?;
    let sheet = compose(&records, &template, font.as_deref())?;

    let output_file = args.output.unwrap_or_else(|| {
        PathBuf::from(default_output_name(
            template.audience,
            sheet.labels.first().map(String::as_str),
            sheet.grid_size,
        ))
    });
    std::fs::write(&output_file, &sheet.document)?;

    println!("✓ Generated: {}", output_file.display());
    println!("  Template: {}", template.name);
    println!("  Cards: {}", sheet.labels.len());
    println!("  Pages: {}", sheet.pages);

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn load_font(path: &Option<PathBuf>) -> Result<Option<Vec<u8>>, AppError> {
    match path {
        Some(p) => {
            let bytes = std::fs::read(p)
                .map_err(|e| AppError::FontError(format!("{}: {}", p.display(), e)))?;
            Ok(Some(bytes))
        }
        None => {
            log::warn!("No font given (--font or PRICECARD_FONT); Japanese text will not render");
            Ok(None)
        }
    }
}

fn default_output_name(audience: Audience, first_label: Option<&str>, grid_size: u32) -> String {
    let audience = match audience {
        Audience::Business => "toB",
        Audience::Consumer => "toC",
    };
    let sanitized_label = first_label
        .unwrap_or("")
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect::<String>();
    let label = if sanitized_label.is_empty() {
        "cards".to_string()
    } else {
        sanitized_label
    };
    format!("output_{}_{}_{}.pdf", audience, label, grid_size)
}
