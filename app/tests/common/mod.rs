//! FILENAME: tests/common/mod.rs
//! Test harness for CandleView session tests.

#![allow(dead_code)]

use app_lib::Session;
use engine::{CellValue, Dataset};
use market_data::{BatchReport, FetchError};
use view_engine::ViewEngine;

/// Session writing into a byte buffer.
pub struct TestHarness {
    pub session: Session<Vec<u8>>,
}

impl TestHarness {
    pub fn new() -> Self {
        let report = BatchReport {
            succeeded: vec!["SOLUSDT".into(), "BTCUSD".into()],
            failed: vec![(
                "JUPUSD".into(),
                FetchError::Status {
                    url: "/klines?symbol=JUPUSD".into(),
                    status: 400,
                },
            )],
            warnings: vec!["BTCUSD: bid/ask unavailable (timeout)".into()],
        };
        TestHarness {
            session: Session::new(ViewEngine::new(Self::dataset()), report, Vec::new()),
        }
    }

    pub fn dataset() -> Dataset {
        let rows = vec![
            ("SOLUSDT", "2024-01-01", 100.0, 10.0),
            ("SOLUSDT", "2024-01-02", 110.0, 20.0),
            ("BTCUSD", "2024-01-01", 40000.0, 5.0),
        ];
        Dataset::from_rows(
            ["symbol", "date", "close", "volume"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rows.into_iter()
                .map(|(s, d, c, v)| {
                    vec![
                        CellValue::text(s),
                        CellValue::text(d),
                        CellValue::Number(c),
                        CellValue::Number(v),
                    ]
                })
                .collect(),
        )
        .unwrap()
    }

    /// Runs a command line and returns what it printed.
    pub fn run(&mut self, line: &str) -> String {
        let before = self.session.output().len();
        if let Err(e) = self.session.run_line(line) {
            panic!("command '{}' failed: {}", line, e);
        }
        String::from_utf8_lossy(&self.session.output()[before..]).into_owned()
    }

    /// Runs a command line expected to fail and returns the error text.
    pub fn run_err(&mut self, line: &str) -> String {
        match self.session.run_line(line) {
            Ok(_) => panic!("command '{}' unexpectedly succeeded", line),
            Err(e) => e.to_string(),
        }
    }
}
