//! Permission encoding for stored records.
//!
//! A record keeps ownership and mode as a single string:
//!
//! ```text
//! alice:staff -rw-r--r--
//! ^^^^^ ^^^^^ ^^^^^^^^^^
//! owner group type char + 9 rwx characters (user, group, other)
//! ```
//!
//! Decoding yields a [`Permission`] whose `mode` is a decimal number with one
//! digit per octant (`rwxr-xr--` decodes to `754`), not an octal integer. The
//! stored format depends on this arithmetic, so it must not change.

use crate::{Error, Result};

/// Characters allowed in the 9-character rwx segment.
const RWX_ALPHABET: &[char] = &['r', 'w', 'x', '-', 's', 'S', 't', 'T'];

/// Place value of each octant (user, group, other).
const OCTANT_PLACES: [u32; 3] = [100, 10, 1];

/// Ownership and mode decoded from a permission encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub owner: String,
    pub group: String,
    /// Decimal digit-per-octant mode, 0 to 777
    pub mode: u32,
}

impl Permission {
    /// Read each decimal digit of `mode` as an octal digit.
    ///
    /// This yields the mode bits applied when a record is restored
    /// (`754` becomes `0o754`).
    pub fn unix_mode(&self) -> u32 {
        let user = (self.mode / 100) % 10;
        let group = (self.mode / 10) % 10;
        let other = self.mode % 10;
        (user << 6) | (group << 3) | other
    }
}

/// Build a permission encoding: `"<owner>:<group> <file_type><rwx>"`.
pub fn encode(owner: &str, group: &str, file_type: char, rwx: &str) -> Result<String> {
    if rwx.chars().count() != 9 {
        return Err(Error::MalformedEncoding(format!(
            "rwx segment must be 9 characters, got {:?}",
            rwx
        )));
    }
    if let Some(bad) = rwx.chars().find(|c| !RWX_ALPHABET.contains(c)) {
        return Err(Error::MalformedEncoding(format!(
            "invalid character {:?} in rwx segment {:?}",
            bad, rwx
        )));
    }
    Ok(format!("{}:{} {}{}", owner, group, file_type, rwx))
}

/// Decode a permission encoding into owner, group and digit-per-octant mode.
///
/// # Errors
/// Returns [`Error::MalformedEncoding`] when the string has no space, the
/// ownership segment has no colon, or the mode segment is shorter than
/// 10 characters (type char + 9).
pub fn decode(encoding: &str) -> Result<Permission> {
    let (ownership, mode_segment) = encoding
        .split_once(' ')
        .ok_or_else(|| Error::MalformedEncoding(format!("missing space in {:?}", encoding)))?;

    let (owner, group) = ownership.split_once(':').ok_or_else(|| {
        Error::MalformedEncoding(format!("missing owner:group separator in {:?}", encoding))
    })?;

    if mode_segment.chars().count() < 10 {
        return Err(Error::MalformedEncoding(format!(
            "mode segment too short in {:?}",
            encoding
        )));
    }

    // The first character is the file type. Within a triple, read, write and
    // execute weigh 4, 2 and 1.
    let mut mode = 0;
    for (i, ch) in mode_segment.chars().skip(1).take(9).enumerate() {
        if ch != '-' {
            mode += (4 >> (i % 3)) * OCTANT_PLACES[i / 3];
        }
    }

    Ok(Permission {
        owner: owner.to_string(),
        group: group.to_string(),
        mode,
    })
}

/// Render the ls-style type character for a raw `st_mode`.
pub fn file_type_char(st_mode: u32) -> char {
    match st_mode & 0o170000 {
        0o140000 => 's',
        0o120000 => 'l',
        0o060000 => 'b',
        0o040000 => 'd',
        0o020000 => 'c',
        0o010000 => 'p',
        _ => '-',
    }
}

/// Render the 9-character ls-style permission string for a raw `st_mode`.
///
/// Setuid, setgid and sticky bits show as `s`/`S` and `t`/`T` in the execute
/// slot of the matching octant.
pub fn rwx_string(st_mode: u32) -> String {
    let special: [(u32, char, char); 3] =
        [(0o4000, 's', 'S'), (0o2000, 's', 'S'), (0o1000, 't', 'T')];
    let mut out = String::with_capacity(9);

    for (octant, &(special_bit, set_exec, set_no_exec)) in special.iter().enumerate() {
        let shift = 6 - 3 * octant as u32;
        let bits = (st_mode >> shift) & 0o7;

        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });

        let exec = bits & 0o1 != 0;
        let ch = match (st_mode & special_bit != 0, exec) {
            (true, true) => set_exec,
            (true, false) => set_no_exec,
            (false, true) => 'x',
            (false, false) => '-',
        };
        out.push(ch);
    }

    out
}
