use std::fmt::Write as _;
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::events::StockEvent;
use crate::types::snapshot::Snapshot;

const FAILURE_TEXT: &str = "Something went wrong somewhere";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Admin plus every subscriber.
    All,
    AdminOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub image: Option<String>,
    pub audience: Audience,
}

impl Message {
    pub fn text(text: impl Into<String>, audience: Audience) -> Self {
        Self {
            text: text.into(),
            image: None,
            audience,
        }
    }

    pub fn from_event(event: &StockEvent) -> Self {
        match event {
            StockEvent::Restocked {
                store_name,
                available,
                image_ref,
                ..
            } => Self {
                text: format!("There are {available} new goodie bags at {store_name}"),
                image: image_ref.clone(),
                audience: Audience::All,
            },
            StockEvent::SoldOut { store_name, .. } => Self::text(
                format!("Sold out! There are no more goodie bags available at {store_name}."),
                Audience::All,
            ),
            StockEvent::QuantityChanged {
                store_name,
                previous,
                current,
                ..
            } => Self::text(
                format!(
                    "There was a change of number of goodie bags in stock from {previous} to {current} at {store_name}."
                ),
                Audience::All,
            ),
        }
    }

    pub fn heartbeat(now: DateTime<Local>, snapshot: &Snapshot) -> Self {
        let mut text = format!(
            "Current time: {}. The bot is still running. ",
            now.format("%a %b %e %H:%M:%S %Y")
        );

        for record in snapshot.iter() {
            let _ = write!(
                text,
                "{}: {} items available. ",
                record.store_name, record.available_count
            );
        }

        Self::text(text, Audience::AdminOnly)
    }

    pub fn startup(check_every: Duration, heartbeat_every: Duration) -> Self {
        Self::text(
            format!(
                "The bot has started successfully. The bot checks every {} if there is something new at the marketplace. Every {}, the bot sends a 'still alive'-message.",
                describe_period(check_every),
                describe_period(heartbeat_every),
            ),
            Audience::AdminOnly,
        )
    }

    pub fn failure(detail: Option<&str>) -> Self {
        let text = match detail {
            Some(detail) => format!("{FAILURE_TEXT}: {detail}"),
            None => format!("{FAILURE_TEXT}."),
        };

        Self::text(text, Audience::AdminOnly)
    }
}

fn describe_period(period: Duration) -> String {
    let seconds = period.as_secs();

    let (value, unit) = if seconds >= 3600 && seconds % 3600 == 0 {
        (seconds / 3600, "hour")
    } else if seconds >= 60 && seconds % 60 == 0 {
        (seconds / 60, "minute")
    } else {
        (seconds, "second")
    };

    if value == 1 {
        format!("{value} {unit}")
    } else {
        format!("{value} {unit}s")
    }
}
