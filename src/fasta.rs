use crate::error::ViewerError;
use bio::io::fasta;

/// FASTA text for download: `>{name}` followed by the sequence on one line.
pub fn to_fasta(name: &str, seq: &str) -> Result<String, ViewerError> {
    let name = name.trim();
    let (id, description) = match name.split_once(char::is_whitespace) {
        Some((id, description)) => (id, Some(description.trim_start())),
        None => (name, None),
    };
    let mut buffer = vec![];
    {
        let mut writer = fasta::Writer::new(&mut buffer);
        writer.write(id, description, seq.as_bytes())?;
        writer.flush()?;
    }
    let mut text = String::from_utf8_lossy(&buffer).into_owned();
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}
