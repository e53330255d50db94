//! CSI parameter parsing
//!
//! Parameters are semicolon-separated numbers. Each one may carry
//! colon-separated subparameters (`38:2::255:0:0`), kept alongside it.

/// Maximum number of parameters we'll track
const MAX_PARAMS: usize = 32;

/// CSI parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    /// Parameter values (0 means default/unspecified)
    values: Vec<u16>,
    /// Subparameters following each value
    subparams: Vec<Vec<u16>>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create params from a slice
    pub fn from_slice(values: &[u16]) -> Self {
        Self {
            values: values.to_vec(),
            subparams: vec![Vec::new(); values.len()],
        }
    }

    /// Parse parameters from the bytes collected between the CSI marker
    /// and the intermediates. Values saturate at `u16::MAX`.
    pub fn parse(bytes: &[u8]) -> Self {
        let mut params = Self::new();
        if bytes.is_empty() {
            return params;
        }

        for group in bytes.split(|&b| b == b';') {
            if params.values.len() == MAX_PARAMS {
                break;
            }
            let mut parts = group.split(|&b| b == b':').map(parse_number);
            params.values.push(parts.next().unwrap_or(0));
            params.subparams.push(parts.collect());
        }

        params
    }

    /// Get parameter at index; `None` if absent or 0 (default)
    pub fn get(&self, index: usize) -> Option<u16> {
        self.values.get(index).copied().filter(|&v| v != 0)
    }

    /// Get parameter at index with default value
    pub fn get_or(&self, index: usize, default: u16) -> u16 {
        self.get(index).unwrap_or(default)
    }

    /// Get raw value at index (0 if not present)
    pub fn raw(&self, index: usize) -> u16 {
        self.values.get(index).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Subparameters of the parameter at index (empty when there are none)
    pub fn subparams(&self, index: usize) -> &[u16] {
        self.subparams.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over raw parameter values
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.values.iter().copied()
    }
}

fn parse_number(digits: &[u8]) -> u16 {
    digits
        .iter()
        .filter(|b| b.is_ascii_digit())
        .fold(0u16, |acc, &b| {
            acc.saturating_mul(10).saturating_add(u16::from(b - b'0'))
        })
}
