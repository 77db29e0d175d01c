// Participants list: name, affiliation, country

use std::path::Path;

use qmeta_recon::Participant;

use crate::csv::{column, field, read_rows};
use crate::error::IoError;

/// Participants from a CSV with a header row, or `None` when the file does
/// not exist. A `name` column is required, along with `affiliation` or
/// `country` (or both). Other columns are ignored.
pub fn load_participants(path: &Path) -> Result<Option<Vec<Participant>>, IoError> {
    if !path.exists() {
        log::warn!("participants file {} not found, continuing without it", path.display());
        return Ok(None);
    }
    let rows = read_rows(path)?;
    let Some((header, body)) = rows.split_first() else {
        return Ok(Some(Vec::new()));
    };

    let name = Some(required(path, header, &["name", "speaker"])?);
    let affiliation = column(header, &["affiliation", "institute"]);
    let country = column(header, &["country"]);
    if affiliation.is_none() && country.is_none() {
        required(path, header, &["affiliation", "institute"])?;
    }

    let participants: Vec<Participant> = body
        .iter()
        .map(|row| Participant {
            name: field(row, name).to_string(),
            affiliation: field(row, affiliation).to_string(),
            country: field(row, country).to_string(),
        })
        .collect();
    log::info!("{}: {} participant(s)", path.display(), participants.len());
    Ok(Some(participants))
}

fn required(path: &Path, header: &[String], names: &[&str]) -> Result<usize, IoError> {
    column(header, names).ok_or_else(|| IoError::MissingColumn {
        path: path.display().to_string(),
        column: names[0].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_columns_by_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("participants.csv");
        fs::write(
            &path,
            "Year,Name,Affiliation,Country\n2019,\"Lee, Alice\",Fermilab,US\n2019,Bin Wu,JYFL\n",
        )
        .unwrap();
        let ps = load_participants(&path).unwrap().unwrap();
        assert_eq!(ps.len(), 2);
        assert_eq!(ps[0].name, "Lee, Alice");
        assert_eq!(ps[0].country, "US");
        assert_eq!(ps[1].country, "");
    }

    #[test]
    fn country_is_optional() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("p.csv");
        fs::write(&path, "name,institute\nC. Chen,KEK\n").unwrap();
        let ps = load_participants(&path).unwrap().unwrap();
        assert_eq!(ps[0].affiliation, "KEK");
        assert_eq!(ps[0].country, "");
    }

    #[test]
    fn affiliation_is_optional_with_country() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("p.csv");
        fs::write(&path, "name,country\nJean-Yves Ollitrault,France\n").unwrap();
        let ps = load_participants(&path).unwrap().unwrap();
        assert_eq!(ps[0].affiliation, "");
        assert_eq!(ps[0].country, "France");

        fs::write(&path, "name,year\nX,2019\n").unwrap();
        let err = load_participants(&path).unwrap_err();
        assert!(matches!(err, IoError::MissingColumn { ref column, .. } if column == "affiliation"));
    }

    #[test]
    fn missing_name_column_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("p.csv");
        fs::write(&path, "who,affiliation\nX,Y\n").unwrap();
        let err = load_participants(&path).unwrap_err();
        assert!(matches!(err, IoError::MissingColumn { ref column, .. } if column == "name"));
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempdir().unwrap();
        assert!(load_participants(&dir.path().join("none.csv")).unwrap().is_none());
    }
}
