use clap::{Parser, ValueEnum};
use stockreclib::{
    error::{Result, StockrecError},
    formats::{csv::Mb51Csv, xml::SimpleXml},
    model::Ledger,
    reconcile_with_summary,
    traits::{ReadFormat, WriteFormat},
};
use std::fs::File;
use std::io::{self, BufReader, Write};
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Fmt {
    Csv,
    Xml,
}

#[derive(Parser, Debug)]
#[command(name = "stockrec", version, about = "Сверка сторно в выгрузке движений запаса MB51")]
struct Cli {
    /// Вид сторнирующего движения (102, 122, ...); исходные — на единицу меньше
    #[arg(short = 't', long = "movement-type", value_parser = clap::value_parser!(u16).range(1..))]
    movement_type: u16,

    /// Входной файл (по умолчанию stdin)
    #[arg(short = 'i', long = "input")]
    input: Option<String>,

    /// Выходной файл (по умолчанию stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Формат входа
    #[arg(long = "in-format", value_enum, default_value = "csv")]
    in_format: Fmt,

    /// Формат выхода
    #[arg(long = "out-format", value_enum, default_value = "csv")]
    out_format: Fmt,
}

fn main() -> Result<()> {
    // stdout занят результатом, логи — в stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let reader: Box<dyn io::Read> = match &cli.input {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin()),
    };
    let br = BufReader::new(reader);

    let ledger = match cli.in_format {
        Fmt::Csv => Mb51Csv::read(br),
        Fmt::Xml => SimpleXml::read(br),
    }?;
    tracing::info!(
        records = ledger.len(),
        input = cli.input.as_deref().unwrap_or("-"),
        "ledger loaded"
    );

    let outcome = reconcile_with_summary(&ledger, cli.movement_type)?;
    tracing::info!(summary = %outcome.summary, "reconciliation finished");
    let result = Ledger::from_records(outcome.records)?.with_extra_columns(ledger.extra_columns);

    let mut writer: Box<dyn Write> = match cli.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };

    match cli.out_format {
        Fmt::Csv => Mb51Csv::write(&mut writer, &result),
        Fmt::Xml => SimpleXml::write(&mut writer, &result),
    }?;

    writer.flush().map_err(StockrecError::from)
}
