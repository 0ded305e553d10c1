use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Integer payload of a [`Value`](super::Value). Magnitudes that do not fit
/// an `i64` are kept unsigned. Equality, ordering and hashing go by value,
/// so `Signed(5) == Unsigned(5)`.
#[derive(Debug, Clone, Copy)]
pub enum Int {
    Signed(i64),
    Unsigned(u64),
}

impl Int {
    pub fn from_i128(wide: i128, prefer_unsigned: bool) -> Option<Int> {
        if prefer_unsigned && wide >= 0 {
            if let Ok(value) = u64::try_from(wide) {
                return Some(Int::Unsigned(value));
            }
        }
        if let Ok(value) = i64::try_from(wide) {
            return Some(Int::Signed(value));
        }
        u64::try_from(wide).ok().map(Int::Unsigned)
    }

    /// Literal integers are signed unless their magnitude forces `u64`.
    pub fn from_u64(value: u64) -> Int {
        match i64::try_from(value) {
            Ok(signed) => Int::Signed(signed),
            Err(_) => Int::Unsigned(value),
        }
    }

    pub fn widen(&self) -> i128 {
        match *self {
            Int::Signed(v) => v as i128,
            Int::Unsigned(v) => v as i128,
        }
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(self, Int::Unsigned(_))
    }

    pub fn to_i64(&self) -> Option<i64> {
        match *self {
            Int::Signed(v) => Some(v),
            Int::Unsigned(v) => i64::try_from(v).ok(),
        }
    }

    pub fn to_f64(&self) -> f64 {
        match *self {
            Int::Signed(v) => v as f64,
            Int::Unsigned(v) => v as f64,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.widen() == 0
    }

    /// Applies a checked binary operation. Two signed operands stay in `i64`;
    /// once an unsigned operand is involved the result is computed wide and
    /// narrowed back, preferring the unsigned representation.
    pub fn checked(
        self,
        rhs: Int,
        signed: impl Fn(i64, i64) -> Option<i64>,
        wide: impl Fn(i128, i128) -> Option<i128>,
    ) -> Option<Int> {
        match (self, rhs) {
            (Int::Signed(l), Int::Signed(r)) => signed(l, r).map(Int::Signed),
            (l, r) => {
                let result = wide(l.widen(), r.widen())?;
                Int::from_i128(result, true)
            }
        }
    }

    pub fn checked_add(self, rhs: Int) -> Option<Int> {
        self.checked(rhs, i64::checked_add, i128::checked_add)
    }

    pub fn checked_sub(self, rhs: Int) -> Option<Int> {
        self.checked(rhs, i64::checked_sub, i128::checked_sub)
    }

    pub fn checked_mul(self, rhs: Int) -> Option<Int> {
        self.checked(rhs, i64::checked_mul, i128::checked_mul)
    }

    pub fn checked_rem(self, rhs: Int) -> Option<Int> {
        self.checked(rhs, i64::checked_rem, i128::checked_rem)
    }

    pub fn checked_neg(self) -> Option<Int> {
        Int::from_i128(-self.widen(), false)
    }

    pub fn bit_width(&self) -> u32 {
        64
    }

    pub fn checked_shl(self, amount: u32) -> Option<Int> {
        if amount >= self.bit_width() {
            return None;
        }
        match self {
            Int::Signed(v) => v.checked_shl(amount).map(Int::Signed),
            Int::Unsigned(v) => v.checked_shl(amount).map(Int::Unsigned),
        }
    }

    pub fn checked_shr(self, amount: u32) -> Option<Int> {
        if amount >= self.bit_width() {
            return None;
        }
        match self {
            Int::Signed(v) => v.checked_shr(amount).map(Int::Signed),
            Int::Unsigned(v) => v.checked_shr(amount).map(Int::Unsigned),
        }
    }

    pub fn bitand(self, rhs: Int) -> Int {
        match (self, rhs) {
            (Int::Signed(l), Int::Signed(r)) => Int::Signed(l & r),
            (l, r) => Int::Unsigned(l.bits() & r.bits()),
        }
    }

    pub fn bitor(self, rhs: Int) -> Int {
        match (self, rhs) {
            (Int::Signed(l), Int::Signed(r)) => Int::Signed(l | r),
            (l, r) => Int::Unsigned(l.bits() | r.bits()),
        }
    }

    pub fn not(self) -> Int {
        match self {
            Int::Signed(v) => Int::Signed(!v),
            Int::Unsigned(v) => Int::Unsigned(!v),
        }
    }

    fn bits(&self) -> u64 {
        match *self {
            Int::Signed(v) => v as u64,
            Int::Unsigned(v) => v,
        }
    }
}

impl PartialEq for Int {
    fn eq(&self, other: &Self) -> bool {
        self.widen() == other.widen()
    }
}

impl Eq for Int {}

impl Hash for Int {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.widen().hash(state);
    }
}

impl PartialOrd for Int {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Int {
    fn cmp(&self, other: &Self) -> Ordering {
        self.widen().cmp(&other.widen())
    }
}

impl std::fmt::Display for Int {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Int::Signed(v) => write!(f, "{v}"),
            Int::Unsigned(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for Int {
    fn from(value: i64) -> Self {
        Int::Signed(value)
    }
}

impl From<u64> for Int {
    fn from(value: u64) -> Self {
        Int::from_u64(value)
    }
}
