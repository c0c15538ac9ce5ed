//! Унифицированные трэйты чтения/записи ledger на основе std::io::{BufRead, Write}.

use crate::{error::Result, model::Ledger};
use std::io::{BufRead, Write};

pub trait ReadFormat {
    fn read<R: BufRead>(r: R) -> Result<Ledger>;
}

pub trait WriteFormat {
    fn write<W: Write>(w: W, ledger: &Ledger) -> Result<()>;
}

pub trait Format: ReadFormat + WriteFormat {}
impl<T: ReadFormat + WriteFormat> Format for T {}
