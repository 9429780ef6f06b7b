// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Settings rejected at startup are reported through the `log` facade.

use std::sync::Mutex;

use kiln_core::RendererSettings;
use log::{Level, LevelFilter, Log, Metadata, Record};

struct CapturedWarnings(Mutex<Vec<String>>);

impl Log for CapturedWarnings {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.0.lock().unwrap().push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

static WARNINGS: CapturedWarnings = CapturedWarnings(Mutex::new(Vec::new()));

fn warnings() -> Vec<String> {
    let _ = log::set_logger(&WARNINGS);
    log::set_max_level(LevelFilter::Warn);
    WARNINGS.0.lock().unwrap().clone()
}

#[test]
fn test_rejected_settings_are_logged() {
    warnings();
    let settings = RendererSettings {
        query_buffers: 0,
        ..RendererSettings::default()
    };
    assert!(settings.validate().is_err());
    assert!(RendererSettings::from_json("{ \"max_resources\": \"many\" }").is_err());

    let logged = warnings();
    assert!(logged
        .iter()
        .any(|line| line.contains("Rejected settings") && line.contains("query_buffers")));
    assert!(logged
        .iter()
        .any(|line| line.contains("Could not parse settings")));
}
