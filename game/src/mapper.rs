//! MMC1 CHR bank switching from the vblank handler.
//!
//! MMC1 registers are loaded one bit at a time: five writes of bit 0, LSB first,
//! and the address of the fifth write picks the register. PRG banks belong to
//! the runtime's `banked_call` trampoline; only CHR bank 0 is switched here.

use bit_field::BitField;
use volatile_register::WO;

pub const MMC1_CHR_0: usize = 0xa000;

/// The five values written, in order, to load `value` into a register.
#[inline]
pub fn serial_bits(value: u8) -> [u8; 5] {
    let mut bits = [0; 5];
    for (i, bit) in bits.iter_mut().enumerate() {
        *bit = value.get_bit(i) as u8;
    }
    bits
}

pub struct Mmc1<'a> {
    pub chr_0: &'a mut WO<u8>,
}

impl Mmc1<'static> {
    /// # Safety
    /// Serial loads must not interleave. Only the vblank handler loads CHR
    /// bank 0; a second load started mid-way lands in the wrong register.
    pub unsafe fn new() -> Mmc1<'static> {
        unsafe {
            Mmc1 {
                chr_0: &mut *(MMC1_CHR_0 as *mut WO<u8>),
            }
        }
    }
}

impl Mmc1<'_> {
    #[inline(always)]
    fn load(register: &mut WO<u8>, value: u8) {
        for bit in serial_bits(value) {
            unsafe { register.write(bit) };
        }
    }

    pub fn set_chr_bank_0(&mut self, bank: u8) {
        Self::load(self.chr_0, bank);
    }
}
