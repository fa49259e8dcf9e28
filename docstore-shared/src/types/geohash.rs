//! Geohash encoding and decoding for `location` fields.
//!
//! A geohash is a base-32 string of interleaved longitude/latitude bits,
//! starting with longitude. Every character carries five bits, so each extra
//! character shrinks the cell it denotes. Decoding yields the cell center,
//! which is only as precise as the hash is long.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Geohash base-32 alphabet (excludes a, i, l and o).
const ALPHABET: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Maps an ASCII byte to its 5-bit value (255 = not in the alphabet).
/// Upper-case letters decode like their lower-case forms.
const DECODE_TABLE: [u8; 128] = {
    let mut table = [255u8; 128];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        table[ALPHABET[i].to_ascii_uppercase() as usize] = i as u8;
        i += 1;
    }
    table
};

/// Bits per geohash character.
const BITS_PER_CHAR: usize = 5;

/// Longest supported geohash (60 bits, sub-centimetre cells).
pub const MAX_PRECISION: usize = 12;

/// Precision used when none is given, matching the search engine's default level.
pub const DEFAULT_PRECISION: usize = MAX_PRECISION;

/// Errors from geohash construction and parsing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeohashError {
    #[error("Latitude {0} is outside [-90, 90]")]
    InvalidLatitude(f64),

    #[error("Longitude {0} is outside [-180, 180]")]
    InvalidLongitude(f64),

    #[error("Geohash precision {0} is outside 1..={MAX_PRECISION}")]
    InvalidPrecision(usize),

    #[error("Geohash is empty")]
    Empty,

    #[error("Geohash has {0} characters, at most {MAX_PRECISION} are supported")]
    TooLong(usize),

    #[error("Invalid geohash character '{character}' at position {position}")]
    InvalidCharacter { character: char, position: usize },
}

/// A validated latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point, rejecting non-finite or out-of-range coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeohashError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeohashError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeohashError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// The rectangular cell a geohash denotes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl GeoBounds {
    /// Center of the cell.
    pub fn center(&self) -> GeoPoint {
        GeoPoint {
            latitude: (self.min_latitude + self.max_latitude) / 2.0,
            longitude: (self.min_longitude + self.max_longitude) / 2.0,
        }
    }

    /// Height of the cell in degrees of latitude.
    pub fn latitude_span(&self) -> f64 {
        self.max_latitude - self.min_latitude
    }

    /// Width of the cell in degrees of longitude.
    pub fn longitude_span(&self) -> f64 {
        self.max_longitude - self.min_longitude
    }

    /// Whether the point lies inside the cell (edges included).
    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&point.latitude)
            && (self.min_longitude..=self.max_longitude).contains(&point.longitude)
    }
}

/// A validated, lower-case geohash string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Geohash(String);

impl Geohash {
    /// Encode a point at the given precision (number of characters).
    ///
    /// # Example
    ///
    /// ```
    /// use docstore_shared::{GeoPoint, Geohash};
    ///
    /// let point = GeoPoint::new(57.64911, 10.40744).unwrap();
    /// let hash = Geohash::encode(point, 11).unwrap();
    /// assert_eq!(hash.as_str(), "u4pruydqqvj");
    /// ```
    pub fn encode(point: GeoPoint, precision: usize) -> Result<Self, GeohashError> {
        if precision == 0 || precision > MAX_PRECISION {
            return Err(GeohashError::InvalidPrecision(precision));
        }

        let mut longitude_range = (-180.0_f64, 180.0_f64);
        let mut latitude_range = (-90.0_f64, 90.0_f64);
        let mut even_bit = true;
        let mut hash = String::with_capacity(precision);

        for _ in 0..precision {
            let mut index = 0usize;
            for _ in 0..BITS_PER_CHAR {
                let (range, value) = if even_bit {
                    (&mut longitude_range, point.longitude)
                } else {
                    (&mut latitude_range, point.latitude)
                };
                let mid = (range.0 + range.1) / 2.0;
                index <<= 1;
                if value >= mid {
                    index |= 1;
                    range.0 = mid;
                } else {
                    range.1 = mid;
                }
                even_bit = !even_bit;
            }
            hash.push(ALPHABET[index] as char);
        }

        Ok(Self(hash))
    }

    /// Encode a longitude/latitude pair at [`DEFAULT_PRECISION`].
    pub fn from_lon_lat(longitude: f64, latitude: f64) -> Result<Self, GeohashError> {
        Self::encode(GeoPoint::new(latitude, longitude)?, DEFAULT_PRECISION)
    }

    /// The cell this geohash denotes.
    pub fn bounds(&self) -> GeoBounds {
        let mut longitude_range = (-180.0_f64, 180.0_f64);
        let mut latitude_range = (-90.0_f64, 90.0_f64);
        let mut even_bit = true;

        for byte in self.0.bytes() {
            // Characters were validated on construction.
            let bits = DECODE_TABLE[byte as usize];
            for shift in (0..BITS_PER_CHAR).rev() {
                let range = if even_bit {
                    &mut longitude_range
                } else {
                    &mut latitude_range
                };
                let mid = (range.0 + range.1) / 2.0;
                if (bits >> shift) & 1 == 1 {
                    range.0 = mid;
                } else {
                    range.1 = mid;
                }
                even_bit = !even_bit;
            }
        }

        GeoBounds {
            min_latitude: latitude_range.0,
            max_latitude: latitude_range.1,
            min_longitude: longitude_range.0,
            max_longitude: longitude_range.1,
        }
    }

    /// Decode to the center of the cell.
    pub fn decode(&self) -> GeoPoint {
        self.bounds().center()
    }

    pub fn decode_latitude(&self) -> f64 {
        self.decode().latitude
    }

    pub fn decode_longitude(&self) -> f64 {
        self.decode().longitude
    }

    /// Number of characters in the hash.
    pub fn precision(&self) -> usize {
        self.0.len()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Geohash {
    type Err = GeohashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(GeohashError::Empty);
        }
        let length = s.chars().count();
        if length > MAX_PRECISION {
            return Err(GeohashError::TooLong(length));
        }
        for (position, character) in s.chars().enumerate() {
            let valid = character.is_ascii() && DECODE_TABLE[character as usize] != 255;
            if !valid {
                return Err(GeohashError::InvalidCharacter {
                    character,
                    position,
                });
            }
        }
        Ok(Self(s.to_ascii_lowercase()))
    }
}

impl fmt::Display for Geohash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Geohash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Geohash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
