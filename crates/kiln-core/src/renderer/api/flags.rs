// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A small declarative flag-set generator.
//!
//! Flag sets in this crate are plain `Copy` newtypes over an integer with
//! `const` members, so they can be built in `const` contexts and compared
//! cheaply during state reconciliation.

/// Declares a flag-set newtype with `const` members and the usual set operations.
///
/// ```
/// kiln_core::kiln_bitflags! {
///     /// Example flags.
///     pub struct Example: u8 {
///         /// First bit.
///         const A = 1 << 0;
///         /// Second bit.
///         const B = 1 << 1;
///     }
/// }
///
/// let both = Example::A | Example::B;
/// assert!(both.contains(Example::A));
/// assert!(!Example::A.intersects(Example::B));
/// ```
#[macro_export]
macro_rules! kiln_bitflags {
    (
        $(#[$outer:meta])*
        $vis:vis struct $name:ident: $ty:ty {
            $(
                $(#[$inner:meta])*
                const $flag:ident = $value:expr;
            )*
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis struct $name {
            bits: $ty,
        }

        impl $name {
            $(
                $(#[$inner])*
                pub const $flag: Self = Self { bits: $value };
            )*

            /// Returns a set with no flags.
            pub const fn empty() -> Self {
                Self { bits: 0 }
            }

            /// Creates a set from raw bits. Unknown bits are kept.
            pub const fn from_bits(bits: $ty) -> Self {
                Self { bits }
            }

            /// Returns the raw bits.
            pub const fn bits(&self) -> $ty {
                self.bits
            }

            /// Returns `true` if no flag is set.
            pub const fn is_empty(&self) -> bool {
                self.bits == 0
            }

            /// Returns `true` if every flag in `other` is also set in `self`.
            pub const fn contains(&self, other: Self) -> bool {
                (self.bits & other.bits) == other.bits
            }

            /// Returns `true` if `self` and `other` share at least one flag.
            pub const fn intersects(&self, other: Self) -> bool {
                (self.bits & other.bits) != 0
            }

            /// Returns the union of both sets.
            pub const fn union(self, other: Self) -> Self {
                Self {
                    bits: self.bits | other.bits,
                }
            }

            /// Returns the flags of `self` that are not in `other`.
            pub const fn difference(self, other: Self) -> Self {
                Self {
                    bits: self.bits & !other.bits,
                }
            }

            /// Sets every flag of `other`.
            pub fn insert(&mut self, other: Self) {
                self.bits |= other.bits;
            }

            /// Clears every flag of `other`.
            pub fn remove(&mut self, other: Self) {
                self.bits &= !other.bits;
            }
        }

        impl ::std::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self::Output {
                self.union(rhs)
            }
        }

        impl ::std::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.insert(rhs);
            }
        }

        impl ::std::ops::BitAnd for $name {
            type Output = Self;

            fn bitand(self, rhs: Self) -> Self::Output {
                Self {
                    bits: self.bits & rhs.bits,
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    crate::kiln_bitflags! {
        struct Sample: u32 {
            const A = 1 << 0;
            const B = 1 << 1;
            const C = 1 << 2;
            const AB = Self::A.bits() | Self::B.bits();
        }
    }

    #[test]
    fn composed_constant_contains_members() {
        assert!(Sample::AB.contains(Sample::A));
        assert!(Sample::AB.contains(Sample::B));
        assert!(!Sample::AB.contains(Sample::C));
    }

    #[test]
    fn insert_and_remove() {
        let mut flags = Sample::empty();
        assert!(flags.is_empty());

        flags.insert(Sample::A | Sample::C);
        assert!(flags.intersects(Sample::C));

        flags.remove(Sample::C);
        assert_eq!(flags, Sample::A);
        assert_eq!(flags.difference(Sample::A), Sample::empty());
    }

    #[test]
    fn bitand_keeps_shared_bits() {
        let shared = Sample::AB & Sample::from_bits(0b110);
        assert_eq!(shared, Sample::B);
    }
}
