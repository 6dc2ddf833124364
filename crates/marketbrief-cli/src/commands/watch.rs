use std::sync::Arc;

use tracing::{info, warn};

use marketbrief_core::{
    AlertEvaluator, InstrumentCatalog, MailSettings, Notifier, OutboundMessage,
    ReqwestHttpClient, SmtpNotifier, YahooSource,
};

use crate::cli::WatchArgs;
use crate::error::CliError;

pub async fn run(args: &WatchArgs) -> Result<(), CliError> {
    let settings = if args.dry_run {
        None
    } else {
        Some(MailSettings::from_env()?)
    };

    let catalog = InstrumentCatalog::from_csv_path(&args.catalog)?;
    info!(
        catalog = %args.catalog.display(),
        instruments = catalog.len(),
        threshold = args.threshold,
        "checking intraday moves"
    );

    let notifier = match settings {
        Some(settings) => Some(SmtpNotifier::new(settings)?),
        None => None,
    };

    let source = Arc::new(YahooSource::new(Arc::new(ReqwestHttpClient::new())));
    let evaluator = AlertEvaluator::new(source);

    for instrument in &catalog {
        // A failed check is logged and the remaining instruments still
        // run; only delivery failures abort the sweep.
        let event = match evaluator.evaluate(instrument, args.threshold).await {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(error) => {
                warn!(symbol = %instrument.symbol, error = %error, "alert check failed");
                continue;
            }
        };

        info!(
            symbol = %event.instrument.symbol,
            change = event.change_percent,
            "alert triggered"
        );
        match &notifier {
            Some(notifier) => {
                let message = OutboundMessage::new(event.subject(), event.text_body());
                notifier.send(&message).await?;
            }
            None => println!("{}", event.text_body()),
        }
    }

    Ok(())
}
