#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Board file parsing for tank battles.
//!
//! A board file starts with a free-text description line, followed by the
//! `MaxSteps`, `NumShells`, `Rows` and `Cols` settings in that order and an
//! ASCII map. Problems with the header are fatal and reported through
//! [`BoardFileError`]. Problems with the map are corrected in place and
//! collected as [`RecoverableError`] values so the battle can still run.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tank_battle_core::{BattleSetup, CellCoord, PlayerId, TankSpawn, Terrain};
use thiserror::Error;
use tracing::warn;

const KEY_MAX_STEPS: &str = "MaxSteps";
const KEY_NUM_SHELLS: &str = "NumShells";
const KEY_ROWS: &str = "Rows";
const KEY_COLS: &str = "Cols";
const KEY_AREA: &str = "Rows * Cols";

/// Largest board the parser accepts.
const MAX_CELLS: u64 = 1 << 24;

/// Problems that prevent a board file from being used at all.
#[derive(Debug, Error)]
pub enum BoardFileError {
    /// The file could not be read.
    #[error("failed to read board file {}", path.display())]
    Io {
        /// Location that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file ended before the named setting.
    #[error("missing line for {key}")]
    MissingLine {
        /// Setting that was expected next.
        key: &'static str,
    },
    /// A setting line carries no `=` separator.
    #[error("line missing '=': {line}")]
    MissingSeparator {
        /// Offending line.
        line: String,
    },
    /// A setting line names the wrong key.
    #[error("expected key '{expected}', found '{found}'")]
    UnexpectedKey {
        /// Setting that was expected.
        expected: &'static str,
        /// Key found on the line.
        found: String,
    },
    /// A setting value does not parse as an integer.
    #[error("value for {key} is not an integer: '{value}'")]
    NotAnInteger {
        /// Setting being parsed.
        key: &'static str,
        /// Raw value with whitespace removed.
        value: String,
    },
    /// A setting value lies outside its permitted range.
    #[error("{key} must be {expectation}, found {value}")]
    OutOfRange {
        /// Setting being parsed.
        key: &'static str,
        /// Human-readable description of the permitted range.
        expectation: &'static str,
        /// Parsed value.
        value: i64,
    },
}

/// Map problem that was corrected while parsing.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RecoverableError {
    /// The map has fewer rows than declared.
    #[error("Missing row {row}, adding empty row.")]
    MissingRow {
        /// Index of the padded row.
        row: u32,
    },
    /// The map has more rows than declared.
    #[error("Too many rows in map, truncating after row {last_row}")]
    TooManyRows {
        /// Index of the last kept row.
        last_row: u32,
    },
    /// A row is shorter than the declared width.
    #[error("Row {row} too short, padding with spaces.")]
    RowTooShort {
        /// Index of the padded row.
        row: u32,
    },
    /// A row is longer than the declared width.
    #[error("Row {row} too long, truncating to {columns} columns.")]
    RowTooLong {
        /// Index of the truncated row.
        row: u32,
        /// Declared width.
        columns: u32,
    },
    /// A digit other than a player number.
    #[error("Unrecognized character '{character}' at ({column},{row}), treating as space")]
    UnrecognizedDigit {
        /// Offending digit.
        character: char,
        /// Column of the digit.
        column: u32,
        /// Row of the digit.
        row: u32,
    },
    /// Any other unknown map symbol.
    #[error("Invalid character '{character}' at ({column},{row}), treating as space")]
    InvalidCharacter {
        /// Offending symbol.
        character: char,
        /// Column of the symbol.
        column: u32,
        /// Row of the symbol.
        row: u32,
    },
}

/// Successfully parsed board file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedBoard {
    /// Free-text description from the first line.
    pub description: String,
    /// Validated battle description.
    pub setup: BattleSetup,
    /// Map problems that were corrected, in detection order.
    pub recoverable: Vec<RecoverableError>,
}

/// Reads and parses the board file at `path`.
pub fn load_board(path: impl AsRef<Path>) -> Result<ParsedBoard, BoardFileError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| BoardFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_board(&text)
}

/// Parses board file contents.
pub fn parse_board(text: &str) -> Result<ParsedBoard, BoardFileError> {
    let mut lines = text.lines().map(|line| line.trim_end_matches('\r'));

    let description = lines.next().unwrap_or_default().to_owned();
    let max_steps = read_setting(lines.next(), KEY_MAX_STEPS)?;
    let num_shells = read_setting(lines.next(), KEY_NUM_SHELLS)?;
    let rows = read_setting(lines.next(), KEY_ROWS)?;
    let columns = read_setting(lines.next(), KEY_COLS)?;

    let max_steps = non_negative(KEY_MAX_STEPS, max_steps)?;
    let num_shells = non_negative(KEY_NUM_SHELLS, num_shells)?;
    let rows = positive(KEY_ROWS, rows)?;
    let columns = positive(KEY_COLS, columns)?;
    within_area(rows, columns)?;

    let mut recoverable = Vec::new();
    let map = normalize_map(lines.collect(), columns, rows, &mut recoverable);

    let mut terrain = Vec::with_capacity(map.len() * columns as usize);
    let mut spawns = Vec::new();
    for (row, symbols) in (0_u32..).zip(&map) {
        for (column, symbol) in (0_u32..).zip(symbols.iter().copied()) {
            terrain.push(match symbol {
                '#' => Terrain::Wall,
                '@' => Terrain::Mine,
                _ => Terrain::Empty,
            });

            if let Some(player) = PlayerId::from_symbol(symbol) {
                spawns.push(TankSpawn {
                    player,
                    cell: CellCoord::new(column, row),
                });
                continue;
            }

            match symbol {
                ' ' | '#' | '@' => {}
                digit if digit.is_ascii_digit() => {
                    recoverable.push(RecoverableError::UnrecognizedDigit {
                        character: digit,
                        column,
                        row,
                    });
                }
                other => {
                    recoverable.push(RecoverableError::InvalidCharacter {
                        character: other,
                        column,
                        row,
                    });
                }
            }
        }
    }

    for error in &recoverable {
        warn!(%error, "recoverable board error");
    }

    Ok(ParsedBoard {
        description,
        setup: BattleSetup {
            max_steps,
            num_shells,
            columns,
            rows,
            terrain,
            spawns,
        },
        recoverable,
    })
}

fn read_setting(line: Option<&str>, key: &'static str) -> Result<i64, BoardFileError> {
    let line = line.ok_or(BoardFileError::MissingLine { key })?;
    let Some((lhs, rhs)) = line.split_once('=') else {
        return Err(BoardFileError::MissingSeparator {
            line: line.to_owned(),
        });
    };

    let found = strip_whitespace(lhs);
    if found != key {
        return Err(BoardFileError::UnexpectedKey {
            expected: key,
            found,
        });
    }

    let value = strip_whitespace(rhs);
    value
        .parse::<i64>()
        .map_err(|_| BoardFileError::NotAnInteger { key, value })
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn non_negative(key: &'static str, value: i64) -> Result<u32, BoardFileError> {
    u32::try_from(value).map_err(|_| BoardFileError::OutOfRange {
        key,
        expectation: "a non-negative 32-bit integer",
        value,
    })
}

fn positive(key: &'static str, value: i64) -> Result<u32, BoardFileError> {
    match u32::try_from(value) {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(BoardFileError::OutOfRange {
            key,
            expectation: "a positive 32-bit integer",
            value,
        }),
    }
}

fn within_area(rows: u32, columns: u32) -> Result<(), BoardFileError> {
    let cells = u64::from(rows) * u64::from(columns);
    if cells > MAX_CELLS {
        return Err(BoardFileError::OutOfRange {
            key: KEY_AREA,
            expectation: "at most 16777216 cells",
            value: i64::try_from(cells).unwrap_or(i64::MAX),
        });
    }
    Ok(())
}

/// Pads or truncates the raw map to exactly `rows` rows of `columns` symbols.
fn normalize_map(
    raw: Vec<&str>,
    columns: u32,
    rows: u32,
    recoverable: &mut Vec<RecoverableError>,
) -> Vec<Vec<char>> {
    let width = columns as usize;
    let height = rows as usize;
    let mut map: Vec<Vec<char>> = raw.iter().map(|line| line.chars().collect()).collect();

    for row in map.len()..height {
        recoverable.push(RecoverableError::MissingRow { row: row as u32 });
        map.push(vec![' '; width]);
    }
    if map.len() > height {
        recoverable.push(RecoverableError::TooManyRows { last_row: rows - 1 });
        map.truncate(height);
    }

    for (row, symbols) in (0_u32..).zip(map.iter_mut()) {
        if symbols.len() < width {
            recoverable.push(RecoverableError::RowTooShort { row });
            symbols.resize(width, ' ');
        } else if symbols.len() > width {
            recoverable.push(RecoverableError::RowTooLong { row, columns });
            symbols.truncate(width);
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(map: &str) -> String {
        let header = "test board\nMaxSteps = 50\nNumShells=3\n Rows = 3\nCols= 4\n";
        format!("{header}{map}")
    }

    #[test]
    fn parses_header_and_map() {
        let parsed = parse_board(&board("#  1\n @  \n2   \n")).expect("valid board");

        assert_eq!(parsed.description, "test board");
        assert_eq!(parsed.setup.max_steps, 50);
        assert_eq!(parsed.setup.num_shells, 3);
        assert_eq!((parsed.setup.columns, parsed.setup.rows), (4, 3));
        assert_eq!(parsed.setup.terrain[0], Terrain::Wall);
        assert_eq!(parsed.setup.terrain[5], Terrain::Mine);
        assert_eq!(
            parsed.setup.spawns,
            vec![
                TankSpawn {
                    player: PlayerId::One,
                    cell: CellCoord::new(3, 0),
                },
                TankSpawn {
                    player: PlayerId::Two,
                    cell: CellCoord::new(0, 2),
                },
            ]
        );
        assert!(parsed.recoverable.is_empty());
    }

    #[test]
    fn tolerates_carriage_returns() {
        let text = "d\r\nMaxSteps=1\r\nNumShells=1\r\nRows=1\r\nCols=2\r\n12\r\n";

        let parsed = parse_board(text).expect("valid board");

        assert_eq!(parsed.setup.spawns.len(), 2);
        assert!(parsed.recoverable.is_empty());
    }

    #[test]
    fn pads_and_truncates_map() {
        let parsed = parse_board(&board("1\n2    x\n")).expect("valid board");

        assert_eq!(
            parsed.recoverable,
            vec![
                RecoverableError::MissingRow { row: 2 },
                RecoverableError::RowTooShort { row: 0 },
                RecoverableError::RowTooLong { row: 1, columns: 4 },
            ]
        );
        assert_eq!(parsed.setup.terrain.len(), 12);
        assert_eq!(parsed.setup.spawns.len(), 2);
    }

    #[test]
    fn reports_surplus_rows_once() {
        let parsed = parse_board(&board("1   \n    \n   2\n    \n    \n")).expect("valid board");

        assert_eq!(
            parsed.recoverable,
            vec![RecoverableError::TooManyRows { last_row: 2 }]
        );
    }

    #[test]
    fn unknown_symbols_become_empty_ground() {
        let parsed = parse_board(&board("1 3 \n x  \n   2\n")).expect("valid board");

        assert_eq!(
            parsed.recoverable,
            vec![
                RecoverableError::UnrecognizedDigit {
                    character: '3',
                    column: 2,
                    row: 0,
                },
                RecoverableError::InvalidCharacter {
                    character: 'x',
                    column: 1,
                    row: 1,
                },
            ]
        );
        assert_eq!(parsed.setup.terrain[2], Terrain::Empty);
        assert_eq!(
            parsed.recoverable[1].to_string(),
            "Invalid character 'x' at (1,1), treating as space"
        );
    }

    #[test]
    fn header_errors_are_fatal() {
        assert!(matches!(
            parse_board("d\nMaxSteps=5\nNumShells=1\n"),
            Err(BoardFileError::MissingLine { key: "Rows" })
        ));
        assert!(matches!(
            parse_board("d\nMaxSteps 5\n"),
            Err(BoardFileError::MissingSeparator { .. })
        ));
        assert!(matches!(
            parse_board("d\nNumShells=5\n"),
            Err(BoardFileError::UnexpectedKey {
                expected: "MaxSteps",
                ..
            })
        ));
        assert!(matches!(
            parse_board("d\nMaxSteps=five\n"),
            Err(BoardFileError::NotAnInteger {
                key: "MaxSteps",
                ..
            })
        ));
        assert!(matches!(
            parse_board("d\nMaxSteps=5\nNumShells=-1\nRows=1\nCols=1\n"),
            Err(BoardFileError::OutOfRange {
                key: "NumShells",
                ..
            })
        ));
        assert!(matches!(
            parse_board("d\nMaxSteps=5\nNumShells=1\nRows=0\nCols=1\n"),
            Err(BoardFileError::OutOfRange { key: "Rows", .. })
        ));
    }

    #[test]
    fn oversized_board_is_rejected_before_allocation() {
        let result = parse_board("d\nMaxSteps=5\nNumShells=1\nRows=100000\nCols=100000\n");

        let Err(error) = result else {
            panic!("oversized board accepted");
        };
        assert!(matches!(
            error,
            BoardFileError::OutOfRange {
                key: "Rows * Cols",
                value: 10_000_000_000,
                ..
            }
        ));
        assert_eq!(
            error.to_string(),
            "Rows * Cols must be at most 16777216 cells, found 10000000000"
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let error = load_board("/nonexistent/tank-battle/board.txt").expect_err("missing file");

        assert!(matches!(error, BoardFileError::Io { .. }));
    }
}
