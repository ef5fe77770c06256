use anyhow::Result;

use crate::{
    config::credentials::Credentials,
    notify::{DynamicNotifier, dry_run::DryRunNotifier},
    scenario::notifiers::NotifierKind,
    telegram::telegram_notifier::TelegramNotifier,
};

pub struct Scenario;

impl Scenario {
    pub fn notifier(kind: NotifierKind, credentials: &Credentials) -> Result<DynamicNotifier> {
        tracing::info!(notifier = %kind, "creating notifier");

        let notifier: DynamicNotifier = match kind {
            NotifierKind::DryRun => Box::new(DryRunNotifier),
            NotifierKind::Telegram => {
                let config = credentials.telegram()?.clone();

                Box::new(TelegramNotifier::new(config)?)
            }
        };

        Ok(notifier)
    }
}
