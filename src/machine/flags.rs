use crate::instructions::CondCode;
use crate::Word;

/// The four-bit condition register.
///
/// N and Z always follow the 16-bit result read as signed. C and V follow
/// the additive rules below; subtraction feeds the two's complement of its
/// second operand through the same rules.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Flags {
    pub n: bool,
    pub z: bool,
    pub c: bool,
    pub v: bool,
}

impl Flags {
    pub fn clear(&mut self) {
        *self = Flags::default();
    }

    pub fn set_nz(&mut self, result: Word) {
        self.n = (result as i16) < 0;
        self.z = result == 0;
    }

    /// Adds with full flag effects and returns the 16-bit result.
    ///
    /// Carry: both operands non-negative gives 0, both negative gives 1,
    /// mixed signs give 1 exactly when the result is non-negative.
    /// Overflow: mixed signs give 0, equal signs give 1 exactly when the
    /// result sign differs from the first operand's.
    pub fn add(&mut self, x: Word, y: Word) -> Word {
        let result = x.wrapping_add(y);
        let xn = (x as i16) < 0;
        let yn = (y as i16) < 0;
        let rn = (result as i16) < 0;

        self.c = if !xn && !yn {
            false
        } else if xn && yn {
            true
        } else {
            !rn
        };
        self.v = if xn != yn { false } else { rn != xn };
        self.set_nz(result);
        result
    }

    /// Subtraction as addition of the two's complement.
    pub fn sub(&mut self, x: Word, y: Word) -> Word {
        self.add(x, y.wrapping_neg())
    }

    pub fn condition(&self, cond: CondCode) -> bool {
        match cond {
            CondCode::Z => self.z,
            CondCode::Nz => !self.z,
            CondCode::N => self.n,
            CondCode::P => self.n == self.z,
            CondCode::Lt => self.n != self.v,
            CondCode::Gt => self.n == self.v && !self.z,
            CondCode::C => self.c,
            CondCode::Always => true,
        }
    }

    /// `NZCV` rendered as four binary digits for register dumps.
    pub fn digits(&self) -> String {
        format!(
            "{}{}{}{}",
            self.n as u8, self.z as u8, self.c as u8, self.v as u8
        )
    }
}
