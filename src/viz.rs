//! Chart rendering for the dashboard payload using Plotters

use plotters::prelude::*;

use crate::dashboard::DashboardPayload;

/// Render the monthly revenue trend with the forecast continuation
///
/// Actual revenue is drawn over month indices 0..N; forecast points
/// continue at indices N..N+M in a contrasting color.
///
/// # Arguments
/// * `payload` - Assembled dashboard payload
/// * `output_path` - Path to save the PNG plot
pub fn create_revenue_chart(payload: &DashboardPayload, output_path: &str) -> crate::Result<()> {
    if payload.months.is_empty() {
        tracing::debug!("no monthly data, skipping revenue chart");
        return Ok(());
    }

    let n_actual = payload.actual.len();
    let x_max = (n_actual + payload.forecast.len()) as f64;
    let y_max = payload
        .actual
        .iter()
        .chain(payload.forecast.iter())
        .fold(f64::NEG_INFINITY, |a, &b| a.max(b))
        * 1.1;

    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Monthly Revenue: Actual and Forecast", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..x_max.max(1.0), 0f64..y_max.max(1.0))?;

    chart
        .configure_mesh()
        .x_desc("Month Index")
        .y_desc("Revenue")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            payload
                .actual
                .iter()
                .enumerate()
                .map(|(i, &v)| (i as f64, v)),
            &BLUE,
        ))?
        .label("Actual")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    if !payload.forecast.is_empty() {
        chart
            .draw_series(LineSeries::new(
                payload
                    .forecast
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| ((n_actual + i) as f64, v)),
                &RED,
            ))?
            .label("Forecast")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
    }

    for (i, &v) in payload.actual.iter().enumerate() {
        chart.draw_series(std::iter::once(Circle::new((i as f64, v), 4, BLUE.filled())))?;
    }

    chart.configure_series_labels().draw()?;
    root.present()?;
    println!("Revenue chart saved to: {}", output_path);

    Ok(())
}

/// Render a bar chart of segment sizes per cluster
pub fn create_segment_size_chart(
    payload: &DashboardPayload,
    output_path: &str,
) -> crate::Result<()> {
    let sizes = &payload.segments.values;
    if sizes.is_empty() {
        tracing::debug!("no segment data, skipping segment chart");
        return Ok(());
    }
    let max_size = *sizes.iter().max().unwrap_or(&1) as f64;

    let root = BitMapBackend::new(output_path, (600, 400)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Customer Segment Sizes", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..(sizes.len() as f64), 0f64..(max_size * 1.1))?;

    chart
        .configure_mesh()
        .x_desc("Cluster")
        .y_desc("Number of Customers")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for (i, &size) in sizes.iter().enumerate() {
        chart.draw_series(std::iter::once(Rectangle::new(
            [(i as f64 - 0.4, 0.0), (i as f64 + 0.4, size as f64)],
            BLUE.filled(),
        )))?;
    }

    root.present()?;
    println!("Segment size chart saved to: {}", output_path);

    Ok(())
}

/// Render the full chart set next to `base_output_path`
pub fn render_charts(payload: &DashboardPayload, base_output_path: &str) -> crate::Result<()> {
    create_revenue_chart(payload, base_output_path)?;
    let segment_path = base_output_path.replace(".png", "_segments.png");
    create_segment_size_chart(payload, &segment_path)?;
    Ok(())
}
