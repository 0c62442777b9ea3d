#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::ptr_arg)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::unreachable)]
#![allow(clippy::pedantic)]
#![allow(warnings)]

//! Probe-count experiment for open-addressing collision strategies.
//!
//! Fills a fixed prime-capacity table at increasing load factors and
//! compares linear probing, quadratic probing and double hashing by the
//! number of probes each insert needed. Results are rendered to PNG.

use plotters::prelude::*;
use rand::Rng;

// A prime table size keeps double-hash step sizes coprime to the array
const TABLE_SIZE: usize = 10_007;
const NUM_LOAD_FACTORS: usize = 10;

const METHODS: [&str; 3] = ["Linear Probing", "Quadratic Probing", "Double Hashing"];
const MAX_PROBES: usize = 200; // Prevent unbounded walks on saturated tables

// Same polynomial rolling hash the library uses
fn polynomial_hash(key: &str, multiplier: u64, modulus: usize) -> usize {
    let modulus = modulus as u64;
    let mut hash = 0_u64;
    for byte in key.bytes() {
        hash = (hash * multiplier + u64::from(byte)) % modulus;
    }
    hash as usize
}

fn linear_probing(table: &mut Vec<Option<String>>, key: &str) -> usize {
    let mut index = polynomial_hash(key, 151, TABLE_SIZE);
    let mut probes = 1;

    while table[index].is_some() && probes < MAX_PROBES {
        index = (index + 1) % TABLE_SIZE;
        probes += 1;
    }

    if table[index].is_none() {
        table[index] = Some(key.to_owned());
    }

    probes
}

fn quadratic_probing(table: &mut Vec<Option<String>>, key: &str) -> usize {
    let start = polynomial_hash(key, 151, TABLE_SIZE);
    let mut index = start;
    let mut probes = 1;

    while table[index].is_some() && probes < MAX_PROBES {
        index = (start + probes * probes) % TABLE_SIZE;
        probes += 1;
    }

    if table[index].is_none() {
        table[index] = Some(key.to_owned());
    }

    probes
}

fn double_hashing(table: &mut Vec<Option<String>>, key: &str) -> usize {
    let start = polynomial_hash(key, 151, TABLE_SIZE);
    let step = polynomial_hash(key, 163, TABLE_SIZE) + 1;
    let mut index = start;
    let mut probes = 1;

    while table[index].is_some() && probes < MAX_PROBES {
        index = (start + probes * step) % TABLE_SIZE;
        probes += 1;
    }

    if table[index].is_none() {
        table[index] = Some(key.to_owned());
    }

    probes
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate load factors from 0.1 to 0.95
    let load_factors: Vec<f64> = (0..NUM_LOAD_FACTORS)
        .map(|i| 0.1 + (0.95 - 0.1) * (i as f64) / ((NUM_LOAD_FACTORS - 1) as f64))
        .collect();

    let num_keys: Vec<usize> =
        load_factors.iter().map(|&load| (TABLE_SIZE as f64 * load) as usize).collect();

    println!("Load factors: {:?}", load_factors);
    println!("Number of keys: {:?}", num_keys);

    let mut average_probes: Vec<Vec<f64>> = vec![Vec::new(); METHODS.len()];
    let mut worst_case_probes: Vec<Vec<usize>> = vec![Vec::new(); METHODS.len()];

    // Generate random keys outside the loop to ensure fair comparison
    let mut rng = rand::rng();
    let max_keys_needed = *num_keys.iter().max().unwrap();
    let keys: Vec<String> = (0..max_keys_needed)
        .map(|_| format!("key-{}", rng.random_range(0..100_000_000_u64)))
        .collect();

    for &n_keys in &num_keys {
        println!("Testing with {} keys", n_keys);

        for (method_idx, &method) in METHODS.iter().enumerate() {
            let mut table: Vec<Option<String>> = vec![None; TABLE_SIZE];
            let mut probes_list: Vec<usize> = Vec::with_capacity(n_keys);

            for key in keys.iter().take(n_keys) {
                let probes = match method {
                    "Linear Probing" => linear_probing(&mut table, key),
                    "Quadratic Probing" => quadratic_probing(&mut table, key),
                    "Double Hashing" => double_hashing(&mut table, key),
                    _ => unreachable!("unknown method"),
                };
                probes_list.push(probes);
            }

            let avg = probes_list.iter().sum::<usize>() as f64 / probes_list.len() as f64;
            let worst = *probes_list.iter().max().unwrap_or(&0);

            average_probes[method_idx].push(avg);
            worst_case_probes[method_idx].push(worst);

            println!("  {}: Avg probes = {:.2}, Worst = {}", method, avg, worst);
        }
    }

    let font_family = "sans-serif";

    let colors = [
        RGBColor(220, 50, 50), // Bright red
        RGBColor(50, 90, 220), // Bright blue
        RGBColor(50, 180, 50), // Bright green
    ];

    let line_width = 2;
    let marker_size = 4;
    let text_size = 16;
    let title_size = 35;

    // Plot 1: Average probes per insert
    let root = BitMapBackend::new("average_probes.png", (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_avg = average_probes
        .iter()
        .flat_map(|v| v.iter())
        .fold(0.0, |max, &x| if x > max { x } else { max }) *
        1.1; // Add 10% margin

    let mut chart = ChartBuilder::on(&root)
        .caption("Average Probes per Insert by Collision Strategy", (font_family, title_size))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .right_y_label_area_size(10)
        .build_cartesian_2d(0..(num_keys.len() - 1), 0.0..max_avg)?;

    let x_labels: Vec<String> = num_keys.iter().map(|&n| n.to_string()).collect();

    chart
        .configure_mesh()
        .x_labels(num_keys.len() - 1)
        .x_label_formatter(&|x| {
            if *x < x_labels.len() { x_labels[*x].clone() } else { "".to_string() }
        })
        .x_desc("Number of Keys Inserted")
        .y_desc("Average Probes per Insert")
        .axis_desc_style((font_family, text_size))
        .draw()?;

    // Add a vertical line at the critical load factor (~70%)
    let critical_load_idx = num_keys.len() * 7 / 10;
    if critical_load_idx < num_keys.len() - 1 {
        let reference_style = ShapeStyle::from(&BLACK.mix(0.3)).stroke_width(1);
        chart
            .draw_series(LineSeries::new(
                vec![(critical_load_idx, 0.0), (critical_load_idx, max_avg)],
                reference_style,
            ))?
            .label("~70% Load Factor")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], reference_style));
    }

    for (method_idx, &method) in METHODS.iter().enumerate() {
        let color = &colors[method_idx % colors.len()];
        let line_style = ShapeStyle::from(color).stroke_width(line_width);

        chart
            .draw_series(LineSeries::new(
                (0..num_keys.len() - 1).map(|i| (i, average_probes[method_idx][i])),
                line_style,
            ))?
            .label(method)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        chart.draw_series((0..num_keys.len() - 1).map(|i| {
            Circle::new((i, average_probes[method_idx][i]), marker_size, color.filled())
        }))?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    // Plot 2: Worst-case probes per insert
    let root = BitMapBackend::new("worst_case_probes.png", (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_worst = worst_case_probes
        .iter()
        .flat_map(|v| v.iter())
        .fold(0, |max, &x| if x > max { x } else { max }) as f64 *
        1.1; // Add 10% margin

    let mut chart = ChartBuilder::on(&root)
        .caption("Worst-Case Probes by Collision Strategy", (font_family, title_size))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .right_y_label_area_size(10)
        .build_cartesian_2d(0..(num_keys.len() - 1), 0.0..max_worst)?;

    chart
        .configure_mesh()
        .x_labels(num_keys.len() - 1)
        .x_label_formatter(&|x| {
            if *x < x_labels.len() { x_labels[*x].clone() } else { "".to_string() }
        })
        .x_desc("Number of Keys Inserted")
        .y_desc("Worst-Case Probes")
        .axis_desc_style((font_family, text_size))
        .draw()?;

    // Threshold line where walks start getting cut off (MAX_PROBES / 2)
    let threshold_style = ShapeStyle::from(&RED.mix(0.3)).stroke_width(1);
    chart
        .draw_series(LineSeries::new(
            vec![(0, MAX_PROBES as f64 / 2.0), (num_keys.len() - 1, MAX_PROBES as f64 / 2.0)],
            threshold_style,
        ))?
        .label("Warning Threshold")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], threshold_style));

    for (method_idx, &method) in METHODS.iter().enumerate() {
        let color = &colors[method_idx % colors.len()];
        let line_style = ShapeStyle::from(color).stroke_width(line_width);

        chart
            .draw_series(LineSeries::new(
                (0..num_keys.len() - 1).map(|i| (i, worst_case_probes[method_idx][i] as f64)),
                line_style,
            ))?
            .label(method)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        chart.draw_series((0..num_keys.len() - 1).map(|i| {
            Circle::new((i, worst_case_probes[method_idx][i] as f64), marker_size, color.filled())
        }))?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    println!("Generated plot images: average_probes.png, worst_case_probes.png");

    Ok(())
}
