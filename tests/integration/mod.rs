// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod current_page_test;
pub mod helpers;
pub mod page_store_test;
pub mod period_fetch_cache_test;
