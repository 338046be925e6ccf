// Copyright (C) 2024-2025 The dejs authors.
// This file is part of the dejs library.

// The dejs library is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// The dejs library is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with the dejs library. If not, see <https://www.gnu.org/licenses/>.

pub mod reconstructor;
pub use reconstructor::*;

pub mod visitor;
pub use visitor::*;
