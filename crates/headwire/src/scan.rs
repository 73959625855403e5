//! Three-tier class scanner.
//!
//! `scan` advances a cursor to the first byte outside a [`Class`], or to the
//! end of the buffer, whichever comes first. It never consumes the stopping
//! byte. The tiers, fastest first:
//!
//! 1. a 16-byte SSE2 lane (x86_64 only): per-lane validity compare,
//!    `movemask`, trailing-zero count;
//! 2. an 8-byte SWAR word: the below-floor borrow mask combined with
//!    zero-lane masks for the banned bytes;
//! 3. a scalar walk against the class table.
//!
//! Each tier may hand off early to the next; none may step past a stopping
//! byte. All three stop at the same index for any input; the property
//! tests hold them to the scalar table as the oracle.

use crate::class::Class;
use crate::cursor::Cursor;

/// Advance `cur` to the first byte not allowed by `class`, or to the end of
/// the buffer. The stopping byte (if any) is left unconsumed.
pub(crate) fn scan(cur: &mut Cursor<'_>, class: Class) {
    let floor = class.floor();
    let [ban_a, ban_b] = class.banned();

    #[cfg(all(target_arch = "x86_64", target_feature = "sse2"))]
    while cur.has(lane::WIDTH) {
        let hit = lane::first_disallowed(cur.tail(), floor, ban_a, ban_b);
        if hit < lane::WIDTH {
            cur.advance(hit);
            return;
        }
        cur.advance(lane::WIDTH);
    }

    while cur.has(8) {
        let mask = word_disallowed(cur.load_u64(), floor, ban_a, ban_b);
        if mask != 0 {
            cur.advance((mask.trailing_zeros() >> 3) as usize);
            return;
        }
        cur.advance(8);
    }

    while let Some(byte) = cur.next_byte() {
        if !class.allows(byte) {
            return;
        }
        cur.advance(1);
    }
}

const fn repeat(byte: u8) -> u64 {
    (byte as u64) * 0x0101_0101_0101_0101
}

/// High-bit-per-lane mask of the disallowed bytes in a little-endian packed
/// word. Borrow artifacts can only set lanes above the first genuine hit,
/// so `trailing_zeros() >> 3` always lands on the first disallowed byte.
#[inline]
fn word_disallowed(word: u64, floor: u8, ban_a: u8, ban_b: u8) -> u64 {
    // byte < floor: the subtraction borrow sets lane bit 7; !word masks the
    // high bytes, which sit above every floor and always pass.
    let below = word.wrapping_sub(repeat(floor)) & !word;
    let hit_a = zero_lanes(word ^ repeat(ban_a));
    let hit_b = zero_lanes(word ^ repeat(ban_b));
    (below | hit_a | hit_b) & repeat(0x80)
}

/// Nonzero iff some lane of `word` is zero; set bits confined to lane
/// high bits once masked by the caller.
#[inline]
fn zero_lanes(word: u64) -> u64 {
    word.wrapping_sub(repeat(0x01)) & !word
}

#[cfg(all(target_arch = "x86_64", target_feature = "sse2"))]
mod lane {
    #![allow(unsafe_code)]

    use core::arch::x86_64::{
        __m128i, _mm_and_si128, _mm_cmpeq_epi8, _mm_cmpgt_epi8, _mm_cmplt_epi8, _mm_loadu_si128,
        _mm_movemask_epi8, _mm_or_si128, _mm_set1_epi8,
    };

    pub(super) const WIDTH: usize = 16;

    /// Index of the first disallowed byte within the leading 16 bytes of
    /// `bytes`, or a value >= `WIDTH` when all 16 pass.
    ///
    /// `bytes` must hold at least 16 bytes.
    #[inline]
    pub(super) fn first_disallowed(bytes: &[u8], floor: u8, ban_a: u8, ban_b: u8) -> usize {
        debug_assert!(bytes.len() >= WIDTH);
        // SAFETY: the caller guarantees 16 readable bytes and loadu carries
        // no alignment requirement.
        let mask = unsafe {
            let lanes = _mm_loadu_si128(bytes.as_ptr().cast::<__m128i>());
            // The compares are signed: high bytes (>= 0x80) read as negative
            // and always pass a class floor, so gate below-floor on >= 0.
            let ascii = _mm_cmpgt_epi8(lanes, _mm_set1_epi8(-1));
            let below =
                _mm_and_si128(ascii, _mm_cmplt_epi8(lanes, _mm_set1_epi8(floor as i8)));
            let banned = _mm_or_si128(
                _mm_cmpeq_epi8(lanes, _mm_set1_epi8(ban_a as i8)),
                _mm_cmpeq_epi8(lanes, _mm_set1_epi8(ban_b as i8)),
            );
            _mm_movemask_epi8(_mm_or_si128(below, banned)) as u32
        };
        mask.trailing_zeros() as usize
    }
}
