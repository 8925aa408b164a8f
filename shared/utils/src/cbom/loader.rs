//! CBOM Grid Loader
//!
//! Reads CSV and Excel (XLSX/XLSM/XLS) files into an absolute-coordinate
//! [`Grid`] and resolves which worksheet holds the CBOM.

use calamine::{open_workbook_from_rs, DataType, Range, Reader, Xls, Xlsx};
use std::io::Cursor;
use std::path::Path;

use super::grid::{CellValue, Grid};
use crate::config::CbomConfig;
use crate::error::{MatchwiseError, MatchwiseResult};

/// Sheet identifier reported for CSV sources
pub const CSV_SHEET: &str = "CSV";

/// Supported CBOM file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Xlsx, // XLSX/XLSM
    Xls,
}

impl SourceFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xlsm" => Some(Self::Xlsx),
            "xls" => Some(Self::Xls),
            _ => None,
        }
    }

    /// Detect format from content type header
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type {
            "text/csv" | "application/csv" => Some(Self::Csv),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => Some(Self::Xlsx),
            "application/vnd.ms-excel.sheet.macroEnabled.12" => Some(Self::Xlsx),
            "application/vnd.ms-excel" => Some(Self::Xls),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Xlsx => "XLSX",
            Self::Xls => "XLS",
        }
    }
}

/// A loaded grid plus the sheet it came from
#[derive(Debug, Clone)]
pub struct LoadedGrid {
    pub grid: Grid,
    pub sheet: String,
    pub format: SourceFormat,
}

pub struct GridLoader {
    target_sheet: String,
    require_target: bool,
}

impl GridLoader {
    pub fn new(config: &CbomConfig) -> Self {
        Self {
            target_sheet: config.target_sheet.clone(),
            require_target: false,
        }
    }

    /// A loader that only reads `sheet`, even from a single-sheet workbook
    pub fn for_sheet(sheet: impl Into<String>) -> Self {
        Self {
            target_sheet: sheet.into(),
            require_target: true,
        }
    }

    /// Load a spreadsheet file from disk
    pub fn load_path(&self, path: &Path) -> MatchwiseResult<LoadedGrid> {
        let data = std::fs::read(path).map_err(|e| {
            MatchwiseError::source_unavailable(format!("cannot read {}: {}", path.display(), e))
        })?;
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        self.load_bytes(filename, &data, None)
    }

    /// Load a spreadsheet file from bytes
    pub fn load_bytes(
        &self,
        filename: &str,
        data: &[u8],
        format: Option<SourceFormat>,
    ) -> MatchwiseResult<LoadedGrid> {
        let format = format
            .or_else(|| SourceFormat::from_extension(Path::new(filename)))
            .ok_or_else(|| {
                MatchwiseError::source_unavailable(format!(
                    "unsupported file format: {}. Only .xlsx, .xlsm, .xls and .csv files are supported",
                    filename
                ))
            })?;

        let (grid, sheet) = match format {
            SourceFormat::Csv => (self.read_csv(data)?, CSV_SHEET.to_string()),
            SourceFormat::Xlsx => self.read_workbook::<Xlsx<_>>(data)?,
            SourceFormat::Xls => self.read_workbook::<Xls<_>>(data)?,
        };

        tracing::info!(
            file = %filename,
            format = format.name(),
            sheet = %sheet,
            rows = grid.rows().len(),
            "Loaded spreadsheet grid"
        );

        Ok(LoadedGrid { grid, sheet, format })
    }

    fn read_csv(&self, data: &[u8]) -> MatchwiseResult<Grid> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(data);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(csv_cell).collect());
        }
        Ok(Grid::new(rows))
    }

    fn read_workbook<'d, R>(&self, data: &'d [u8]) -> MatchwiseResult<(Grid, String)>
    where
        R: Reader<Cursor<&'d [u8]>>,
        R::Error: std::fmt::Display,
    {
        let mut workbook: R = open_workbook_from_rs(Cursor::new(data)).map_err(|e| {
            MatchwiseError::source_unavailable(format!("failed to open Excel workbook: {}", e))
        })?;

        let sheet_names: Vec<String> = workbook.sheet_names().to_owned();
        let sheet = self.pick_sheet(&sheet_names)?;

        let range = workbook
            .worksheet_range(&sheet)
            .ok_or_else(|| {
                MatchwiseError::source_unavailable(format!("worksheet '{}' not found", sheet))
            })?
            .map_err(|e| {
                MatchwiseError::source_unavailable(format!("failed to read worksheet '{}': {}", sheet, e))
            })?;

        Ok((range_to_grid(&range), sheet))
    }

    /// Single-sheet workbooks use their only sheet unless the loader was
    /// built with [`GridLoader::for_sheet`]; otherwise the target sheet must
    /// be present (compared case-insensitively).
    pub fn pick_sheet(&self, sheet_names: &[String]) -> MatchwiseResult<String> {
        match sheet_names {
            [] => Err(MatchwiseError::source_unavailable("no sheets found in workbook")),
            [only] if !self.require_target => Ok(only.clone()),
            names => {
                let target = self.target_sheet.trim().to_lowercase();
                names
                    .iter()
                    .find(|name| name.trim().to_lowercase() == target)
                    .cloned()
                    .ok_or_else(|| {
                        MatchwiseError::source_unavailable(format!(
                            "could not find target sheet '{}' among {}",
                            self.target_sheet,
                            names.join(", ")
                        ))
                    })
            }
        }
    }
}

fn csv_cell(field: &str) -> CellValue {
    if field.trim().is_empty() {
        return CellValue::Missing;
    }
    match field.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::Text(field.to_string()),
    }
}

fn excel_cell(cell: &DataType) -> CellValue {
    match cell {
        DataType::Empty => CellValue::Missing,
        DataType::String(s) => CellValue::Text(s.clone()),
        DataType::Int(i) => CellValue::Number(*i as f64),
        DataType::Float(f) | DataType::DateTime(f) => CellValue::Number(*f),
        DataType::Bool(b) => CellValue::Text(b.to_string()),
        DataType::Error(_) => CellValue::Missing,
        other => CellValue::Text(other.to_string()),
    }
}

/// calamine ranges start at the first used cell; shift them back so grid
/// coordinates match the worksheet's own row and column numbers.
fn range_to_grid(range: &Range<DataType>) -> Grid {
    let Some((start_row, start_col)) = range.start() else {
        return Grid::default();
    };
    let (start_row, start_col) = (start_row as usize, start_col as usize);

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); start_row];
    for row in range.rows() {
        let mut cells = vec![CellValue::Missing; start_col];
        cells.extend(row.iter().map(excel_cell));
        rows.push(cells);
    }
    Grid::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cbom::grid::CellGrid;

    fn loader() -> GridLoader {
        GridLoader::new(&CbomConfig::default())
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(SourceFormat::from_extension(Path::new("cbom.csv")), Some(SourceFormat::Csv));
        assert_eq!(SourceFormat::from_extension(Path::new("cbom.XLSX")), Some(SourceFormat::Xlsx));
        assert_eq!(SourceFormat::from_extension(Path::new("cbom.xlsm")), Some(SourceFormat::Xlsx));
        assert_eq!(SourceFormat::from_extension(Path::new("cbom.xls")), Some(SourceFormat::Xls));
        assert_eq!(SourceFormat::from_extension(Path::new("cbom.txt")), None);
        assert_eq!(SourceFormat::from_content_type("text/csv"), Some(SourceFormat::Csv));
    }

    #[test]
    fn test_csv_loading_keeps_positions() {
        let csv_data = b",,Room-001,,ROOM 002\n1234-567-89012,Lamp,5,,0\nbad-id,,3,, \n";
        let loaded = loader().load_bytes("cbom.csv", csv_data, None).unwrap();

        assert_eq!(loaded.sheet, CSV_SHEET);
        assert_eq!(loaded.grid.height(), 3);
        assert_eq!(loaded.grid.width(), 5);
        assert!(loaded.grid.cell(0, 0).is_missing());
        assert_eq!(loaded.grid.cell(0, 2), &CellValue::from("Room-001"));
        assert_eq!(loaded.grid.cell(1, 2), &CellValue::Number(5.0));
        assert_eq!(loaded.grid.cell(1, 0), &CellValue::from("1234-567-89012"));
        assert!(loaded.grid.cell(2, 4).is_missing());
    }

    #[test]
    fn test_unknown_format_is_source_unavailable() {
        let err = loader().load_bytes("cbom.pdf", b"", None).unwrap_err();
        assert_eq!(err.error_code(), "SOURCE_UNAVAILABLE");
    }

    #[test]
    fn test_garbage_workbook_is_source_unavailable() {
        let err = loader()
            .load_bytes("cbom.xlsx", b"definitely not a zip", None)
            .unwrap_err();
        assert_eq!(err.error_code(), "SOURCE_UNAVAILABLE");
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let err = loader()
            .load_path(Path::new("/nonexistent/cbom.xlsx"))
            .unwrap_err();
        assert_eq!(err.error_code(), "SOURCE_UNAVAILABLE");
    }

    #[test]
    fn test_pick_sheet() {
        let loader = loader();
        let single = vec!["Anything".to_string()];
        assert_eq!(loader.pick_sheet(&single).unwrap(), "Anything");

        let many = vec!["Summary".to_string(), " c-bom 830234 ".to_string()];
        assert_eq!(loader.pick_sheet(&many).unwrap(), " c-bom 830234 ");

        let wrong = vec!["Summary".to_string(), "Other".to_string()];
        assert!(loader.pick_sheet(&wrong).is_err());
        assert!(loader.pick_sheet(&[]).is_err());
    }

    #[test]
    fn test_named_sheet_loader_never_falls_back() {
        let loader = GridLoader::for_sheet("12NC_Mapping");
        assert!(loader.pick_sheet(&["Sheet1".to_string()]).is_err());
        assert_eq!(
            loader.pick_sheet(&["12nc_mapping".to_string()]).unwrap(),
            "12nc_mapping"
        );

        let many = vec!["Summary".to_string(), "12NC_Mapping".to_string()];
        assert_eq!(loader.pick_sheet(&many).unwrap(), "12NC_Mapping");
    }

    #[test]
    fn test_range_is_reanchored() {
        let mut range: Range<DataType> = Range::new((2, 1), (3, 2));
        range.set_value((2, 1), DataType::String("Room-001".to_string()));
        range.set_value((3, 2), DataType::Int(4));

        let grid = range_to_grid(&range);
        assert_eq!(grid.cell(2, 1), &CellValue::from("Room-001"));
        assert_eq!(grid.cell(3, 2), &CellValue::Number(4.0));
        assert!(grid.cell(0, 0).is_missing());
        assert!(grid.cell(3, 1).is_missing());
    }

    #[test]
    fn test_excel_cell_mapping() {
        assert!(excel_cell(&DataType::Empty).is_missing());
        assert_eq!(excel_cell(&DataType::Float(2.5)), CellValue::Number(2.5));
        assert_eq!(excel_cell(&DataType::Bool(true)), CellValue::from("true"));
    }
}
