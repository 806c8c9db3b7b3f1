// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MetricsSettings;
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 初始化指标系统
///
/// 未启用时不安装记录器，指标宏调用为空操作
pub fn init_metrics(settings: &MetricsSettings) -> anyhow::Result<()> {
    if !settings.enabled {
        return Ok(());
    }

    let addr: SocketAddr = settings.listen_address.parse()?;

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!(
            "Failed to install Prometheus recorder: {}. This might happen if the port is already in use.",
            e
        );
        return Ok(());
    }

    describe_counter!(
        "period_cache_requests_total",
        "Page cache lookups, labelled by scope (period or current) and hit or miss"
    );
    describe_counter!(
        "period_fetch_failures_total",
        "Failed page fetches, labelled by error kind"
    );
    describe_counter!(
        "period_cache_store_skipped_total",
        "Live captures not stored because a fresh record appeared meanwhile"
    );
    describe_histogram!(
        "period_fetch_duration_seconds",
        "Duration of page fetches in seconds, cache hits included"
    );

    info!("Metrics exporter listening on {}", addr);
    Ok(())
}
