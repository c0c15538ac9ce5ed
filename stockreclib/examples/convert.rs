use stockreclib::{
    formats::{csv::Mb51Csv, xml::SimpleXml},
    model::Ledger,
    reconcile,
    traits::{ReadFormat, WriteFormat},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Пример: сверка 101/102 в CSV -> XML (stdin -> stdout)
    let ledger = Mb51Csv::read(std::io::BufReader::new(std::io::stdin()))?;
    let records = reconcile(&ledger, 102)?;
    let out = Ledger::from_records(records)?.with_extra_columns(ledger.extra_columns);
    SimpleXml::write(std::io::stdout(), &out)?;
    Ok(())
}
