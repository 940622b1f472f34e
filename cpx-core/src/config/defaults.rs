pub(super) fn default_log_level() -> String {
    "info".to_string()
}

pub(super) fn default_log_format() -> String {
    "json".to_string()
}

pub(super) fn default_metrics_prefix() -> String {
    "cpx".to_string()
}

pub(super) fn default_heuristic_percent() -> u32 {
    100
}

pub(super) fn default_heuristic_max_secs() -> u64 {
    24 * 60 * 60
}
