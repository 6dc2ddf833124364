use std::sync::Arc;

use tracing::info;

use marketbrief_core::{
    InstrumentCatalog, MailSettings, Notifier, OutboundMessage, Palette, Report, ReportAssembler,
    ReportPlan, ReqwestHttpClient, SmtpNotifier, StockChartsSource, UtcDateTime, YahooSource,
};

use crate::cli::ReportArgs;
use crate::error::CliError;

pub async fn run(args: &ReportArgs) -> Result<(), CliError> {
    // Mail settings load before any network call so a misconfigured
    // run fails immediately. Dry runs never send, so they skip this.
    let settings = if args.dry_run {
        None
    } else {
        Some(MailSettings::from_env()?)
    };

    let catalog = InstrumentCatalog::from_csv_path(&args.catalog)?;
    info!(
        catalog = %args.catalog.display(),
        instruments = catalog.len(),
        "building market report"
    );

    let palette = if args.green_up {
        Palette::GREEN_GAIN
    } else {
        Palette::RED_GAIN
    };
    let plan = ReportPlan::default()
        .with_horizons(args.horizons.iter().map(|&h| h.into()).collect())
        .with_missing_rows(args.on_failure.into())
        .with_palette(palette);

    let http_client = Arc::new(ReqwestHttpClient::new());
    let source = Arc::new(YahooSource::new(http_client.clone()));
    let mut assembler = ReportAssembler::new(source, plan);
    if args.charts {
        assembler = assembler.with_chart_source(Arc::new(StockChartsSource::new(http_client)));
    }

    let report = assembler.build(&catalog, UtcDateTime::now().date()).await;

    match settings {
        None => {
            print!("{}", report.text_body);
        }
        Some(settings) => {
            let notifier = SmtpNotifier::new(settings)?;
            deliver(&notifier, &report).await?;
        }
    }

    Ok(())
}

/// Hands the assembled report to the notifier. Delivery failures
/// propagate; the run must not end quietly with an unsent report.
async fn deliver(notifier: &dyn Notifier, report: &Report) -> Result<(), CliError> {
    let message =
        OutboundMessage::new(report.subject(), &report.text_body).with_html(&report.html_body);
    notifier.send(&message).await?;
    info!(subject = %message.subject, "report delivered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> Report {
        let generated_at = UtcDateTime::parse("2024-03-01T00:00:00Z")
            .expect("timestamp")
            .date();
        Report {
            title: String::from("Daily Market Report"),
            generated_at,
            rows: Vec::new(),
            notice: None,
            text_body: String::from("Daily Market Report - 2024-03-01\n"),
            html_body: String::from("<html></html>"),
        }
    }

    // Building the mail message fails before any connection is opened,
    // so this exercises the delivery error path offline.
    fn broken_notifier() -> SmtpNotifier {
        let settings = MailSettings {
            username: String::from("not an address"),
            password: String::from("hunter2"),
            host: String::from("smtp.example.com"),
            port: 587,
            recipient: String::from("me@example.com"),
        };
        SmtpNotifier::new(settings).expect("notifier")
    }

    #[tokio::test]
    async fn delivery_failure_propagates_after_assembly() {
        let error = deliver(&broken_notifier(), &report())
            .await
            .expect_err("delivery must fail loudly");

        assert!(matches!(error, CliError::Delivery(_)));
        assert_eq!(error.exit_code(), 10);
    }
}
