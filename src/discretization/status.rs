// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::topology::FaceId;

/// Per-face outcome bits. Only [`StatusFlags::DEGENERATE`] and
/// [`StatusFlags::CANCELLED`] mean the face got no triangulation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusFlags(u32);

impl StatusFlags {
    pub const OK: Self = Self(0);
    /// Two frontier links of the face cross.
    pub const SELF_INTERSECTING: Self = Self(1);
    /// Fewer than three usable boundary vertices.
    pub const DEGENERATE: Self = Self(1 << 1);
    /// A boundary curve could not be evaluated somewhere.
    pub const DEGENERATE_SEGMENT: Self = Self(1 << 2);
    /// A cavity or a constraint could not be built and was backed out.
    pub const LOCAL_FAILURE: Self = Self(1 << 3);
    /// Refinement stopped before every triangle met the deflection.
    pub const TOLERANCE_UNREACHABLE: Self = Self(1 << 4);
    /// Skipped after a stop request.
    pub const CANCELLED: Self = Self(1 << 6);

    const NAMES: [(Self, &'static str); 6] = [
        (Self::SELF_INTERSECTING, "SELF_INTERSECTING"),
        (Self::DEGENERATE, "DEGENERATE"),
        (Self::DEGENERATE_SEGMENT, "DEGENERATE_SEGMENT"),
        (Self::LOCAL_FAILURE, "LOCAL_FAILURE"),
        (Self::TOLERANCE_UNREACHABLE, "TOLERANCE_UNREACHABLE"),
        (Self::CANCELLED, "CANCELLED"),
    ];

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn is_ok(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Whether the face ended without a triangulation.
    pub fn is_fatal(self) -> bool {
        self.contains(Self::DEGENERATE) || self.contains(Self::CANCELLED)
    }
}

impl BitOr for StatusFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for StatusFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for StatusFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ok() {
            return f.write_str("OK");
        }
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// What happened to one face.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaceReport {
    pub face: FaceId,
    pub flags: StatusFlags,
    /// Largest centroid deviation left in the committed mesh.
    pub deviation: f64,
    pub triangles: usize,
    pub vertices: usize,
    /// Interior vertices added by refinement.
    pub inserted: usize,
}

impl FaceReport {
    pub(crate) fn failed(face: FaceId, flags: StatusFlags) -> Self {
        Self {
            face,
            flags,
            deviation: 0.0,
            triangles: 0,
            vertices: 0,
            inserted: 0,
        }
    }
}

/// Aggregate of a whole run.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeshReport {
    pub faces: Vec<FaceReport>,
    /// Union of every face's flags.
    pub flags: StatusFlags,
}

impl MeshReport {
    pub fn push(&mut self, report: FaceReport) {
        self.flags |= report.flags;
        self.faces.push(report);
    }

    pub fn face(&self, face: FaceId) -> Option<&FaceReport> {
        self.faces.iter().find(|r| r.face == face)
    }

    pub fn nb_triangles(&self) -> usize {
        self.faces.iter().map(|r| r.triangles).sum()
    }

    pub fn max_deviation(&self) -> f64 {
        self.faces.iter().map(|r| r.deviation).fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_combine_and_print() {
        let mut f = StatusFlags::OK;
        assert!(f.is_ok());
        f |= StatusFlags::SELF_INTERSECTING;
        f.insert(StatusFlags::LOCAL_FAILURE);
        assert!(f.contains(StatusFlags::SELF_INTERSECTING | StatusFlags::LOCAL_FAILURE));
        assert!(!f.contains(StatusFlags::DEGENERATE));
        assert!(!f.is_fatal());
        assert_eq!(format!("{f:?}"), "SELF_INTERSECTING | LOCAL_FAILURE");
    }
}
