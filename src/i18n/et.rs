//! Estonian translations

use super::StringSet;

pub static STRINGS: StringSet = StringSet {
    title: "Energia p\u{00E4}evane visualiseerimine",
    plot_title: "P\u{00E4}evane tarbimine (kWh)",
    x_axis: "Kuup\u{00E4}ev",
    y_axis: "kWh",
    legend_total: "Kokku",
    summary_total: "Kokku kWh",
    summary_avg: "Keskmine / p\u{00E4}ev (kWh)",
    summary_min: "Min p\u{00E4}ev (kWh)",
    summary_max: "Max p\u{00E4}ev (kWh)",
    summary_today: "T\u{00E4}na (kWh)",
    data_updated: "Andmed uuendatud:",
};
