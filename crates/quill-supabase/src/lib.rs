// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Supabase persistence layer for Quill.
//!
//! Approved drafts are appended to a PostgREST table. Writes are never
//! deduplicated or updated in place.

pub mod adapter;
pub mod client;

pub use adapter::SupabaseStorage;
pub use client::PostgrestClient;
