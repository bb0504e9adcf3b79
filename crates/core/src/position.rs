//! Position sources.
//!
//! The pipeline consumes positions as a stream of readings. A source may be
//! a push channel fed by a sensor, a single fixed reading, or a sensor that is
//! not there at all.

use std::pin::Pin;

use futures_core::Stream;
use futures_util::stream;
use nasta_tag_transit::models::Coordinates;
use tokio::sync::mpsc;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PositionError {
    #[error("position source unavailable")]
    Unavailable,
    #[error("position permission denied")]
    Denied,
    #[error("malformed position reading: {0}")]
    Malformed(String),
}

pub type PositionReading = Result<Coordinates, PositionError>;

pub type PositionStream = Pin<Box<dyn Stream<Item = PositionReading> + Send>>;

/// Push side of [`channel`]
#[derive(Clone, Debug)]
pub struct PositionSender {
    tx: mpsc::UnboundedSender<PositionReading>,
}

impl PositionSender {
    /// Returns false once the stream has been dropped
    pub fn send(&self, reading: PositionReading) -> bool {
        self.tx.send(reading).is_ok()
    }

    pub fn update(&self, position: Coordinates) -> bool {
        self.send(Ok(position))
    }
}

/// A push-based source. The stream ends when every sender is dropped.
pub fn channel() -> (PositionSender, PositionStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    let positions = stream::unfold(rx, |mut rx| async move {
        let reading = rx.recv().await?;
        Some((reading, rx))
    });
    (PositionSender { tx }, Box::pin(positions))
}

/// A single reading, then the source ends
pub fn fixed(position: Coordinates) -> PositionStream {
    Box::pin(stream::iter([PositionReading::Ok(position)]))
}

/// A device without a position sensor
pub fn unavailable() -> PositionStream {
    Box::pin(stream::iter([PositionReading::Err(PositionError::Unavailable)]))
}

/// Parse a `<lat>,<lon>` reading
pub fn parse_reading(input: &str) -> PositionReading {
    let malformed = || PositionError::Malformed(input.to_owned());

    let (lat, lon) = input.trim().split_once(',').ok_or_else(malformed)?;
    let lat: f64 = lat.trim().parse().map_err(|_| malformed())?;
    let lon: f64 = lon.trim().parse().map_err(|_| malformed())?;

    let position = Coordinates::new(lat, lon);
    if !position.is_valid() {
        return Err(malformed());
    }
    Ok(position)
}

#[cfg(test)]
mod tests {
    use futures_util::StreamExt;

    use super::*;

    #[test]
    fn test_parse_reading() {
        let position = parse_reading(" 59.33, 18.06 ").unwrap();
        assert_eq!(position, Coordinates::new(59.33, 18.06));

        for bad in ["", "59.33", "north,east", "91,18", "59.33,181", "NaN,18"] {
            assert!(
                matches!(parse_reading(bad), Err(PositionError::Malformed(_))),
                "{bad:?} accepted"
            );
        }
    }

    #[tokio::test]
    async fn test_channel_ends_with_senders() {
        let (sender, mut positions) = channel();
        assert!(sender.update(Coordinates::new(59.33, 18.06)));
        assert!(sender.send(Err(PositionError::Denied)));
        drop(sender);

        assert_eq!(positions.next().await, Some(Ok(Coordinates::new(59.33, 18.06))));
        assert_eq!(positions.next().await, Some(Err(PositionError::Denied)));
        assert_eq!(positions.next().await, None);
    }

    #[tokio::test]
    async fn test_unavailable_yields_one_error() {
        let readings: Vec<_> = unavailable().collect().await;
        assert_eq!(readings, [Err(PositionError::Unavailable)]);
    }
}
