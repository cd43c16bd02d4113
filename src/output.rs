use std::io::{self, Write};

use crate::error::GtoError;
use crate::gto::Gto;

pub const STATUS_LINE: &str = "SUCCESS";

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_gto(gto: &Gto, pretty: bool) -> Result<(), GtoError> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        Self::write_gto(&mut handle, gto, pretty)
    }

    pub fn write_gto<W: Write>(writer: &mut W, gto: &Gto, pretty: bool) -> Result<(), GtoError> {
        let json = if pretty {
            serde_json::to_string_pretty(gto)
        } else {
            serde_json::to_string(gto)
        }
        .map_err(|err| GtoError::Output(err.to_string()))?;
        Self::emit(writer, &json).map_err(|err| GtoError::Output(err.to_string()))
    }

    fn emit<W: Write>(writer: &mut W, json: &str) -> io::Result<()> {
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.write_all(STATUS_LINE.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}
