//! Print stored registrations, newest first, as tab-separated lines.
//!
//! Columns: email, discord_id, referral_source, created_at (RFC 3339). Empty
//! optional fields print as empty columns. Backslash, tab, carriage return and
//! newline inside a field are written as `\\`, `\t`, `\r` and `\n`, so each
//! record stays on one line with four columns. Reads the same `WAITLIST_*`
//! settings as the server; `--list-limit`/`--list-offset` select the page.

use std::io::Write;
use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;

use waitlist::AppSettings;
use waitlist::domain::ports::RegistrationQuery;
use waitlist::domain::{Registration, RegistrationService};
use waitlist::outbound::persistence::{DbPool, DieselRegistrationRepository};

fn main() -> Result<()> {
    color_eyre::install()?;
    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    let pool_config = settings
        .pool_config()
        .ok_or_else(|| eyre!("WAITLIST_DATABASE_URL must be set to list registrations"))?;

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build runtime")?;

    let registrations = runtime.block_on(async {
        let pool = DbPool::new(pool_config)
            .await
            .wrap_err("failed to connect to the database")?;
        let service = RegistrationService::new(Arc::new(DieselRegistrationRepository::new(pool)));
        service
            .list(settings.list_window())
            .await
            .map_err(|err| eyre!("failed to list registrations: {err}"))
    })?;

    let mut stdout = std::io::stdout().lock();
    for registration in &registrations {
        writeln!(stdout, "{}", format_row(registration))?;
    }
    Ok(())
}

fn escape_field(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn format_row(registration: &Registration) -> String {
    [
        escape_field(registration.email().as_str()),
        escape_field(registration.discord_id().unwrap_or_default()),
        escape_field(registration.referral_source().unwrap_or_default()),
        registration.created_at().to_rfc3339(),
    ]
    .join("\t")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use waitlist::domain::{EmailAddress, RegistrationDraft, RegistrationId};

    fn registration(discord_id: Option<&str>, referral_source: Option<&str>) -> Registration {
        let created_at = Utc
            .with_ymd_and_hms(2025, 6, 1, 8, 0, 0)
            .single()
            .expect("valid timestamp");
        RegistrationDraft::new(
            EmailAddress::parse("ada@example.com").expect("valid email"),
            discord_id.map(str::to_owned),
            referral_source.map(str::to_owned),
        )
        .into_registration(RegistrationId::random(), created_at)
    }

    #[test]
    fn rows_leave_missing_fields_empty() {
        let registration = registration(None, Some("newsletter"));

        assert_eq!(
            format_row(&registration),
            "ada@example.com\t\tnewsletter\t2025-06-01T08:00:00+00:00"
        );
    }

    #[test]
    fn control_characters_stay_inside_their_column() {
        let registration = registration(Some(r"ada\1815"), Some("friend\tat work\r\nsecond line"));

        let row = format_row(&registration);
        assert_eq!(row.lines().count(), 1);
        assert_eq!(row.split('\t').count(), 4);
        assert_eq!(
            row,
            "ada@example.com\tada\\\\1815\tfriend\\tat work\\r\\nsecond line\t2025-06-01T08:00:00+00:00"
        );
    }
}
