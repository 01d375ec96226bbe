//! English translations

use super::StringSet;

pub static STRINGS: StringSet = StringSet {
    title: "Energy Daily Visualization",
    plot_title: "Daily consumption (kWh)",
    x_axis: "Date",
    y_axis: "kWh",
    legend_total: "Total",
    summary_total: "Total kWh",
    summary_avg: "Avg / day (kWh)",
    summary_min: "Min day (kWh)",
    summary_max: "Max day (kWh)",
    summary_today: "Today (kWh)",
    data_updated: "Data updated:",
};
