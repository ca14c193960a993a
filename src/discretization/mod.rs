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

//! The public meshing entry points.
//!
//! A [`Discretizer`] owns one run: a [`MeshContext`] shared by all faces
//! and a per-face state machine (`Unregistered -> Added -> Processed`).
//! [`FaceCoordinator`] fans `process` out over a worker pool.

pub mod context;
pub mod orchestrator;
pub mod parallel;
pub mod parameters;
pub mod status;

pub use context::MeshContext;
pub use orchestrator::{Discretizer, FaceState, perform};
pub use parallel::{FaceCoordinator, StopSignal};
pub use parameters::MeshParameters;
pub use status::{FaceReport, MeshReport, StatusFlags};
