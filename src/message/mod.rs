//! Status messages exchanged with the companion phone app
//!
//! | key | direction | payload      | meaning                              |
//! |-----|-----------|--------------|--------------------------------------|
//! | 0   | in        | int 0–100    | phone battery percent                |
//! | 0   | out       | uint8 0–100  | watch battery percent                |
//! | 1   | in        | any (unused) | phone asks for the watch battery     |

pub mod dict;

use heapless::Vec;

use crate::error::Error;
use dict::{Dictionary, Tuple, Writer, MAX_TUPLES};

/// Phone battery level in, watch battery level out
pub const KEY_BATTERY_PHONE: u32 = 0;
/// Request for the watch battery level
pub const KEY_BATTERY_WATCH: u32 = 1;

/// Size of an encoded outbound message
pub const OUTBOX_LEN: usize = 16;

pub type Outbox = Vec<u8, OUTBOX_LEN>;

/// What an inbound tuple asks the watchface to do
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Show the phone battery percent
    PhoneBattery(u8),
    /// Send the watch battery percent back
    RequestWatchBattery,
}

impl Command {
    /// Interpret one tuple.
    ///
    /// Unknown keys and unusable payloads yield `None`.
    pub fn from_tuple(tuple: &Tuple<'_>) -> Option<Self> {
        match tuple.key {
            KEY_BATTERY_PHONE => tuple
                .value
                .as_integer()
                .filter(|percent| (0..=100).contains(percent))
                .map(|percent| Self::PhoneBattery(percent as u8)),
            KEY_BATTERY_WATCH => Some(Self::RequestWatchBattery),
            _ => None,
        }
    }
}

/// Decode an inbound message into commands, in tuple order.
///
/// Broken framing yields an error and no commands at all. A tuple whose value
/// does not decode is skipped like any other unusable tuple.
pub fn decode(bytes: &[u8]) -> Result<Vec<Command, MAX_TUPLES>, Error> {
    let dict = Dictionary::parse(bytes)?;
    let mut commands = Vec::new();

    for tuple in dict.iter() {
        match Command::from_tuple(tuple) {
            Some(command) => commands.push(command).map_err(|_| Error::TooManyTuples)?,
            None => debug!("ignoring tuple with key {}", tuple.key),
        }
    }

    Ok(commands)
}

/// Encode the watch battery report sent to the phone.
pub fn encode_battery_report(percent: u8) -> Result<Outbox, Error> {
    let mut buf = [0u8; OUTBOX_LEN];
    let mut writer = Writer::new(&mut buf)?;
    writer.write_u8(KEY_BATTERY_PHONE, percent)?;

    Vec::from_slice(writer.finish()).map_err(|_| Error::BufferFull)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dict::Value;

    #[test]
    fn phone_battery_from_integer() {
        let bytes = [1, 0, 0, 0, 0, 3, 4, 0, 42, 0, 0, 0];
        assert_eq!(decode(&bytes).unwrap().as_slice(), &[Command::PhoneBattery(42)]);
    }

    #[test]
    fn phone_battery_from_string() {
        let bytes = [1, 0, 0, 0, 0, 1, 3, 0, b'7', b'5', 0];
        assert_eq!(decode(&bytes).unwrap().as_slice(), &[Command::PhoneBattery(75)]);
    }

    #[test]
    fn phone_battery_out_of_range_is_ignored() {
        let tuple = Tuple { key: KEY_BATTERY_PHONE, value: Value::Int(101) };
        assert_eq!(Command::from_tuple(&tuple), None);

        let tuple = Tuple { key: KEY_BATTERY_PHONE, value: Value::Int(-1) };
        assert_eq!(Command::from_tuple(&tuple), None);

        let tuple = Tuple { key: KEY_BATTERY_PHONE, value: Value::Bytes(&[42]) };
        assert_eq!(Command::from_tuple(&tuple), None);
    }

    #[test]
    fn request_ignores_payload() {
        for value in [
            Value::UInt(0),
            Value::CString(""),
            Value::Bytes(&[]),
            Value::Invalid(Error::BadIntegerWidth(3)),
        ] {
            let tuple = Tuple { key: KEY_BATTERY_WATCH, value };
            assert_eq!(Command::from_tuple(&tuple), Some(Command::RequestWatchBattery));
        }
    }

    #[test]
    fn unknown_keys_are_skipped() {
        let bytes = [
            2, //
            5, 0, 0, 0, 2, 1, 0, 9, //
            1, 0, 0, 0, 2, 1, 0, 0,
        ];
        assert_eq!(decode(&bytes).unwrap().as_slice(), &[Command::RequestWatchBattery]);
    }

    #[test]
    fn bad_tuple_does_not_hide_its_neighbours() {
        // Battery tuple followed by a string tuple without terminator
        let bytes = [
            2, //
            0, 0, 0, 0, 2, 1, 0, 42, //
            9, 0, 0, 0, 1, 1, 0, b'x',
        ];
        assert_eq!(decode(&bytes).unwrap().as_slice(), &[Command::PhoneBattery(42)]);
    }

    #[test]
    fn request_with_undecodable_payload_is_answered() {
        let bytes = [1, 1, 0, 0, 0, 2, 3, 0, 1, 2, 3];
        assert_eq!(decode(&bytes).unwrap().as_slice(), &[Command::RequestWatchBattery]);
    }

    #[test]
    fn phone_battery_with_undecodable_payload_is_ignored() {
        let bytes = [1, 0, 0, 0, 0, 1, 2, 0, b'4', b'2'];
        assert!(decode(&bytes).unwrap().is_empty());
    }

    #[test]
    fn broken_framing_yields_nothing() {
        let bytes = [2, 0, 0, 0, 0, 2, 1, 0, 42];
        assert_eq!(decode(&bytes), Err(Error::Truncated));
    }

    #[test]
    fn battery_report_layout() {
        let report = encode_battery_report(54).unwrap();
        assert_eq!(report.as_slice(), &[1, 0, 0, 0, 0, 2, 1, 0, 54]);
    }
}
