// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use datadesk_core::{DomainKind, Environment, record_quality_issues};
use datadesk_db::Store;
use datadesk_tui::RefreshOutcome;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENVIRONMENT_SETTING: &str = "environment";

/// Bridges the dashboard to the local cache and the optional backend.
/// Records are always served from the store; `refresh` is the only path
/// that talks to the network.
pub struct DeskRuntime<'a> {
    store: &'a mut Store,
    client: Option<datadesk_api::Client>,
    export_dir: PathBuf,
}

impl<'a> DeskRuntime<'a> {
    pub fn new(
        store: &'a mut Store,
        client: Option<datadesk_api::Client>,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            client,
            export_dir,
        }
    }
}

impl datadesk_tui::AppRuntime for DeskRuntime<'_> {
    fn load_records(
        &mut self,
        environment: Environment,
        domain: DomainKind,
    ) -> Result<Vec<datadesk_core::Record>> {
        self.store.list_records(environment, domain)
    }

    fn refresh(&mut self, environment: Environment, domain: DomainKind) -> Result<RefreshOutcome> {
        let Some(client) = &self.client else {
            bail!("no backend configured; set [api] enabled = true in the config");
        };

        let records = client.list_records(domain)?;
        let previous = self
            .store
            .dataset_state(environment, domain)?
            .map(|state| state.fingerprint);
        let fingerprint = self.store.replace_records(environment, domain, &records)?;

        let count = records.len();
        if previous.as_deref() == Some(fingerprint.as_str()) {
            Ok(RefreshOutcome::Unchanged { count })
        } else {
            let flagged = records
                .iter()
                .filter(|record| !record_quality_issues(record).is_empty())
                .count();
            Ok(RefreshOutcome::Changed { count, flagged })
        }
    }

    fn activate_environment(&mut self, environment: Environment) -> Result<()> {
        self.store
            .set_setting(ENVIRONMENT_SETTING, environment.as_str())
    }

    fn write_export(&mut self, file_name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.export_dir.join(file_name);
        fs::write(&path, contents)
            .with_context(|| format!("write export file {}", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::{DeskRuntime, ENVIRONMENT_SETTING};
    use anyhow::Result;
    use datadesk_core::{DomainKind, Environment, FieldValue, Record};
    use datadesk_db::Store;
    use datadesk_tui::{AppRuntime, RefreshOutcome};
    use std::path::PathBuf;
    use std::thread;
    use std::time::Duration;
    use tiny_http::{Header, Response, Server};

    fn partnership(id: &str, name: &str) -> Record {
        Record::from_pairs([
            ("id", FieldValue::text(id)),
            ("name", FieldValue::text(name)),
            ("status", FieldValue::text("Active")),
        ])
    }

    fn json_response(body: &str) -> Response<std::io::Cursor<Vec<u8>>> {
        let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
            .expect("valid header");
        Response::from_string(body).with_header(header)
    }

    #[test]
    fn load_records_reads_the_cached_dataset() -> Result<()> {
        let mut store = Store::open_memory()?;
        store.bootstrap()?;
        store.replace_records(
            Environment::Staging,
            DomainKind::Partnerships,
            &[partnership("LL", "Leaf Life")],
        )?;

        let mut runtime = DeskRuntime::new(&mut store, None, PathBuf::from("/tmp"));
        let records = runtime.load_records(Environment::Staging, DomainKind::Partnerships)?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].display("name"), "Leaf Life");
        Ok(())
    }

    #[test]
    fn refresh_without_backend_reports_actionable_error() -> Result<()> {
        let mut store = Store::open_memory()?;
        store.bootstrap()?;

        let mut runtime = DeskRuntime::new(&mut store, None, PathBuf::from("/tmp"));
        let error = runtime
            .refresh(Environment::Staging, DomainKind::Partnerships)
            .expect_err("refresh needs a backend");
        assert!(error.to_string().contains("[api]"));
        Ok(())
    }

    #[test]
    fn refresh_pulls_records_and_detects_changes() -> Result<()> {
        let server = Server::http("127.0.0.1:0").expect("bind mock server");
        let addr = server.server_addr();
        let handle = thread::spawn(move || {
            let body = r#"{"success":true,"message":"ok","data":[{"id":"LL","name":"Leaf Life","status":"Active","region":"AB"}],"total":1}"#;
            for _ in 0..2 {
                let request = server.recv().expect("receive request");
                assert!(request.url().starts_with("/api/v1/partnerships"));
                request
                    .respond(json_response(body))
                    .expect("send response");
            }
        });

        let client = datadesk_api::Client::new(
            &format!("http://{addr}"),
            None,
            Duration::from_secs(2),
        )?;
        let mut store = Store::open_memory()?;
        store.bootstrap()?;

        {
            let mut runtime = DeskRuntime::new(&mut store, Some(client), PathBuf::from("/tmp"));
            let first = runtime.refresh(Environment::Staging, DomainKind::Partnerships)?;
            assert_eq!(
                first,
                RefreshOutcome::Changed {
                    count: 1,
                    flagged: 0,
                }
            );

            // Identical payload the second time round.
            let second = runtime.refresh(Environment::Staging, DomainKind::Partnerships)?;
            assert_eq!(second, RefreshOutcome::Unchanged { count: 1 });
        }

        handle.join().expect("mock server thread");
        assert_eq!(
            store.record_count(Environment::Staging, DomainKind::Partnerships)?,
            1
        );
        Ok(())
    }

    #[test]
    fn refresh_flags_records_failing_field_checks() -> Result<()> {
        let server = Server::http("127.0.0.1:0").expect("bind mock server");
        let addr = server.server_addr();
        let handle = thread::spawn(move || {
            let body = r#"{"success":true,"message":"ok","data":[{"id":"LL","name":"Leaf Life","status":"Active","region":"AB"},{"id":"ZZ","name":"Zed","status":"Active","region":"XX"}],"total":2}"#;
            let request = server.recv().expect("receive request");
            request
                .respond(json_response(body))
                .expect("send response");
        });

        let client = datadesk_api::Client::new(
            &format!("http://{addr}"),
            None,
            Duration::from_secs(2),
        )?;
        let mut store = Store::open_memory()?;
        store.bootstrap()?;

        {
            let mut runtime = DeskRuntime::new(&mut store, Some(client), PathBuf::from("/tmp"));
            let outcome = runtime.refresh(Environment::Staging, DomainKind::Partnerships)?;
            assert_eq!(
                outcome,
                RefreshOutcome::Changed {
                    count: 2,
                    flagged: 1,
                }
            );
        }

        handle.join().expect("mock server thread");
        // The bad region is cached anyway; refresh reports, never rejects.
        assert_eq!(
            store.record_count(Environment::Staging, DomainKind::Partnerships)?,
            2
        );
        Ok(())
    }

    #[test]
    fn activate_environment_persists_the_setting() -> Result<()> {
        let mut store = Store::open_memory()?;
        store.bootstrap()?;

        {
            let mut runtime = DeskRuntime::new(&mut store, None, PathBuf::from("/tmp"));
            runtime.activate_environment(Environment::Production)?;
        }

        assert_eq!(
            store.get_setting(ENVIRONMENT_SETTING)?.as_deref(),
            Some("production")
        );
        Ok(())
    }

    #[test]
    fn write_export_creates_the_file() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let mut store = Store::open_memory()?;
        store.bootstrap()?;

        let mut runtime = DeskRuntime::new(&mut store, None, temp.path().to_path_buf());
        let path = runtime.write_export("partnerships_export_2026-08-29.csv", "id,name\nLL,Leaf Life\n")?;

        let written = std::fs::read_to_string(&path)?;
        assert!(written.contains("Leaf Life"));
        assert!(path.starts_with(temp.path()));
        Ok(())
    }
}
