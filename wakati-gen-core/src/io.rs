use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter};
use std::path::Path;

use crate::error::{Result, WakatiError};

const UTF8_BOM: &str = "\u{feff}";

/// Reads a whole UTF-8 text file.
///
/// - A leading byte order mark is dropped
/// - Invalid UTF-8 is reported with the 1-based line it occurs on
pub(crate) fn read_text<P: AsRef<Path>>(filename: P) -> Result<String> {
	let path = filename.as_ref();
	let bytes = fs::read(path).map_err(|e| WakatiError::from_io(e, path))?;

	match String::from_utf8(bytes) {
		Ok(mut contents) => {
			if contents.starts_with(UTF8_BOM) {
				contents.replace_range(..UTF8_BOM.len(), "");
			}
			Ok(contents)
		}
		Err(err) => {
			let valid = &err.as_bytes()[..err.utf8_error().valid_up_to()];
			let line = valid.iter().filter(|b| **b == b'\n').count() + 1;
			Err(WakatiError::InvalidEncoding { path: path.to_owned(), line })
		}
	}
}

/// Opens a file for buffered reading.
pub(crate) fn open_reader<P: AsRef<Path>>(filename: P) -> Result<BufReader<File>> {
	let path = filename.as_ref();
	let file = File::open(path).map_err(|e| WakatiError::from_io(e, path))?;
	Ok(BufReader::new(file))
}

/// Calls `f` on every line of a UTF-8 reader, without loading it whole.
///
/// Lines are passed without their `\n` / `\r\n` terminator, along with
/// their 1-based number. `filename` is only used in error reports.
pub(crate) fn read_lines<R, P, F>(mut reader: R, filename: P, mut f: F) -> Result<()>
where
	R: BufRead,
	P: AsRef<Path>,
	F: FnMut(usize, &str) -> Result<()>,
{
	let path = filename.as_ref();
	let mut buf = Vec::new();
	let mut number = 0;

	loop {
		buf.clear();
		if reader.read_until(b'\n', &mut buf)? == 0 {
			break;
		}
		number += 1;

		let mut line = std::str::from_utf8(&buf)
			.map_err(|_| WakatiError::InvalidEncoding { path: path.to_owned(), line: number })?;
		if number == 1 {
			line = line.strip_prefix(UTF8_BOM).unwrap_or(line);
		}
		let line = line.strip_suffix('\n').unwrap_or(line);
		let line = line.strip_suffix('\r').unwrap_or(line);

		f(number, line)?;
	}

	Ok(())
}

/// `true` if `output` exists and resolves to the same file as `input`.
pub(crate) fn same_file<PI: AsRef<Path>, PO: AsRef<Path>>(input: PI, output: PO) -> Result<bool> {
	let input = input.as_ref();
	let output = output.as_ref();
	let input = fs::canonicalize(input).map_err(|e| WakatiError::from_io(e, input))?;
	match fs::canonicalize(output) {
		Ok(output) => Ok(input == output),
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
		Err(e) => Err(WakatiError::from_io(e, output)),
	}
}

/// Creates (or truncates) a file and wraps it in a buffered writer.
pub(crate) fn create_writer<P: AsRef<Path>>(filename: P) -> Result<BufWriter<File>> {
	let path = filename.as_ref();
	let file = File::create(path).map_err(|e| WakatiError::from_io(e, path))?;
	Ok(BufWriter::new(file))
}
