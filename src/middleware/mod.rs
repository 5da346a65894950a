// ABOUTME: HTTP middleware for the Trenera marketplace server
// ABOUTME: Cross-origin configuration applied at router assembly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trenera Fitness

/// CORS middleware configuration
pub mod cors;
