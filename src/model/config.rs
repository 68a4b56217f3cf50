//! View configuration: the small set of display parameters every other
//! component derives its geometry from.

use serde_derive::Deserialize;
use serde_derive::Serialize;
use thiserror::Error;

use crate::model::addr;
use crate::model::versioned;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("word width must be 1, 2, 4 or 8 bytes, not {0}")]
    InvalidWordWidth(i64),
    #[error("row width must not be negative, got {0}")]
    NegativeRowWidth(i64),
    #[error("row width must be at most 4096 words, got {0}")]
    RowWidthTooLarge(u64),
    #[error("{0} is not user-configurable for this view")]
    NotUserConfigurable(&'static str),
    #[error("cannot change view geometry while a selection gesture is in progress")]
    GestureInProgress,
}

macro_rules! declare_config {
    [ $typename:ident {
        $($(#[$attr:meta])* $name:ident : $type:ty = $default:expr),* $(,)?
    } ] => {
        #[derive(Clone, Debug, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $typename {
            $(
                $(#[$attr])*
                pub $name: $type,
            )*

            #[serde(skip)]
            version: versioned::Version::<$typename>
        }

        impl Default for $typename {
            fn default() -> Self {
                Self {
                    $(
                        $name: $default,
                    )*

                    version: core::default::Default::default()
                }
            }
        }

        #[allow(non_camel_case_types)]
        #[derive(Debug, Clone, PartialEq)]
        pub enum Change {
            $(
                $name($type),
            )*
        }

        impl versioned::Versioned for $typename {
            type Change = Change;

            fn version(&self) -> &versioned::Version::<$typename> {
                &self.version
            }

            fn version_mut(&mut self) -> &mut versioned::Version::<$typename> {
                &mut self.version
            }
        }

        impl versioned::Change::<$typename> for Change {
            type ApplyError = ConfigError;
            type ApplyRecord = Self;

            fn apply(self, object: &mut $typename) -> Result<(Self, Self::ApplyRecord), Self::ApplyError> {
                self.validate()?;

                match &self {
                    $(
                        Change::$name(value) => object.$name = value.clone(),
                    )*
                };
                Ok((self.clone(), self))
            }
        }
    };
}

declare_config![ViewConfiguration {
    word_width: usize = 1, /* bytes per word */
    row_width: usize = 16, /* words per row */
    address_size: addr::AddressSize = addr::AddressSize::native(),

    show_address: bool = true,
    show_hex: bool = true,
    show_ascii: bool = true,
    show_comments: bool = true,
    show_address_separator: bool = true,
    hide_leading_address_zeros: bool = false,
    show_column_separators: bool = true,

    #[serde(with = "addr::serde_hex")]
    address_offset: addr::Address = 0, /* address of byte 0 */
    #[serde(with = "addr::serde_hex")]
    cold_zone_end: addr::Address = 0,

    unprintable_char: char = '.',

    user_can_set_word_width: bool = true,
    user_can_set_row_width: bool = true,
}];

/// Widest row accepted, in words.
pub const MAX_ROW_WIDTH: usize = 4096;

/// Converts a caller-supplied word width, rejecting anything but 1, 2, 4 or 8.
pub fn word_width_from(width: i64) -> Result<usize, ConfigError> {
    match width {
        1 | 2 | 4 | 8 => Ok(width as usize),
        _ => Err(ConfigError::InvalidWordWidth(width)),
    }
}

/// Converts a caller-supplied row width, rejecting negative or oversized
/// values.
pub fn row_width_from(width: i64) -> Result<usize, ConfigError> {
    let width = usize::try_from(width).map_err(|_| ConfigError::NegativeRowWidth(width))?;
    check_row_width(width)?;
    Ok(width)
}

fn check_row_width(width: usize) -> Result<(), ConfigError> {
    if width > MAX_ROW_WIDTH {
        Err(ConfigError::RowWidthTooLarge(width as u64))
    } else {
        Ok(())
    }
}

impl Change {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Change::word_width(w) => word_width_from(i64::try_from(*w).unwrap_or(i64::MAX)).map(|_| ()),
            Change::row_width(w) => check_row_width(*w),
            _ => Ok(()),
        }
    }

    /// Whether applying this change moves column boundaries or row contents.
    pub fn affects_geometry(&self) -> bool {
        matches!(self,
                 Change::word_width(_) |
                 Change::row_width(_) |
                 Change::address_size(_) |
                 Change::show_address(_) |
                 Change::show_hex(_) |
                 Change::show_ascii(_) |
                 Change::show_comments(_) |
                 Change::show_address_separator(_) |
                 Change::hide_leading_address_zeros(_))
    }
}

impl ViewConfiguration {
    pub fn bytes_per_row(&self) -> i64 {
        (self.row_width * self.word_width) as i64
    }

    pub fn chars_per_word(&self) -> i64 {
        (self.word_width * 2) as i64
    }

    pub fn word_width(&self) -> i64 {
        self.word_width as i64
    }

    pub fn row_width(&self) -> i64 {
        self.row_width as i64
    }

    pub fn address_format(&self) -> addr::AddressFormat {
        addr::AddressFormat {
            size: self.address_size,
            separator: self.show_address_separator,
            hide_leading_zeros: self.hide_leading_address_zeros,
        }
    }

    /// Rows starting below the cold zone end are drawn distinguished.
    pub fn is_cold(&self, row_offset: addr::Offset) -> bool {
        self.cold_zone_end > self.address_offset
            && row_offset >= 0
            && (row_offset as u64) < self.cold_zone_end - self.address_offset
    }

    /// Checks fields that may have been filled in without going through a
    /// [`Change`], e.g. by deserialization.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Change::word_width(self.word_width).validate()?;
        Change::row_width(self.row_width).validate()
    }
}
