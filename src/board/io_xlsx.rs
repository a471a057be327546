use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::board::*;

// Columns of the roster sheet.
const COL_NAME: usize = 0;
const COL_AMOUNT: usize = 1;
const COL_MINUTES: usize = 2;
const COL_LEVEL: usize = 3;
// Then one (name, hp) pair of columns per member.
const COL_FIRST_MEMBER: usize = 4;

pub fn read_excel_roster(path: &str, source: &RosterSource) -> BoardResult<Vec<ParsedTeam>> {
    let wrange = get_range(path, source)?;
    let first_row = source.first_team_row_index()?;
    debug!("read_excel_roster: first team row: {}", first_row);

    let mut res: Vec<ParsedTeam> = Vec::new();
    for (idx, row) in wrange.rows().enumerate().skip(first_row) {
        if row.iter().all(|c| matches!(c, DataType::Empty)) {
            debug!("read_excel_roster: skipping blank row {}", idx);
            continue;
        }
        // Excel rows start at 1.
        let lineno = (idx + 1) as u64;
        let mut members: Vec<(String, Option<f64>)> = Vec::new();
        let mut col = COL_FIRST_MEMBER;
        while col < row.len() && members.len() < MEMBER_SLOTS {
            let name = cell_string(row.get(col), lineno)?;
            let hp = cell_number(row.get(col + 1), lineno)?;
            members.push((name, hp));
            col += 2;
        }
        let pt = ParsedTeam {
            id: None,
            name: cell_string(row.get(COL_NAME), lineno)?,
            final_amount: cell_number(row.get(COL_AMOUNT), lineno)?,
            play_time_minutes: cell_number(row.get(COL_MINUTES), lineno)?,
            level: cell_number(row.get(COL_LEVEL), lineno)?,
            members,
        };
        debug!("read_excel_roster: line {}: {:?}", lineno, pt);
        res.push(pt);
    }
    Ok(res)
}

fn cell_string(cell: Option<&DataType>, lineno: u64) -> BoardResult<String> {
    match cell {
        None | Some(DataType::Empty) => Ok(String::new()),
        Some(DataType::String(s)) => Ok(s.trim().to_string()),
        Some(DataType::Int(x)) => Ok(x.to_string()),
        Some(DataType::Float(x)) => Ok(x.to_string()),
        Some(x) => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", x),
        }
        .fail(),
    }
}

fn cell_number(cell: Option<&DataType>, lineno: u64) -> BoardResult<Option<f64>> {
    match cell {
        None | Some(DataType::Empty) => Ok(None),
        Some(DataType::Int(x)) => Ok(Some(*x as f64)),
        Some(DataType::Float(x)) => Ok(Some(*x)),
        Some(DataType::String(s)) if s.trim().is_empty() => Ok(None),
        Some(DataType::String(s)) => match s.trim().parse::<f64>() {
            Ok(x) => Ok(Some(x)),
            Err(_) => ExcelWrongCellTypeSnafu {
                lineno,
                content: s.clone(),
            }
            .fail(),
        },
        Some(x) => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", x),
        }
        .fail(),
    }
}

fn get_range(path: &str, source: &RosterSource) -> BoardResult<Range<DataType>> {
    let worksheet_name_o = source.excel_worksheet_name.clone();
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    match worksheet_name_o {
        // A worksheet name was provided, use it.
        Some(name) => {
            let wrange = workbook
                .worksheet_range(&name)
                .context(MissingWorksheetSnafu { name: name.clone() })?
                .context(OpeningExcelSnafu { path })?;
            Ok(wrange)
        }
        None => {
            let num_sheets = workbook.sheet_names().len();
            if num_sheets > 1 {
                warn!(
                    "get_range: {} worksheets in {:?}, using the first one",
                    num_sheets, path
                );
            }
            let wrange = workbook
                .worksheet_range_at(0)
                .context(EmptyExcelSnafu {})?
                .context(OpeningExcelSnafu { path })?;
            Ok(wrange)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells() {
        assert_eq!(cell_string(Some(&DataType::Empty), 2).unwrap(), "");
        assert_eq!(
            cell_string(Some(&DataType::String(" Anna ".to_string())), 2).unwrap(),
            "Anna"
        );
        assert_eq!(
            cell_number(Some(&DataType::Int(35)), 2).unwrap(),
            Some(35.0)
        );
        assert_eq!(
            cell_number(Some(&DataType::String("12.5".to_string())), 2).unwrap(),
            Some(12.5)
        );
        assert_eq!(cell_number(None, 2).unwrap(), None);
        assert!(matches!(
            cell_number(Some(&DataType::Bool(true)), 7),
            Err(BoardError::ExcelWrongCellType { lineno: 7, .. })
        ));
    }

    #[test]
    fn missing_workbook() {
        let source = RosterSource::for_input("/nonexistent/roster.xlsx", None, None);
        let res = read_excel_roster("/nonexistent/roster.xlsx", &source);
        assert!(matches!(res, Err(BoardError::OpeningExcel { .. })));
    }
}
