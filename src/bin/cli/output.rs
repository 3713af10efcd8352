use clap::ValueEnum;
use serde::Serialize;
use taxi::dto::IndexDto;
use taxi::models::{CarDetail, CarSummary, Driver, DriverDetail, Manufacturer};
use taxi::pagination::ListPage;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// Pretty-printed JSON
    Json,
}

/// Bundled output configuration passed to all print functions
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    /// The output format
    pub format: OutputFormat,
    /// When true, print minimal output (just IDs)
    pub quiet: bool,
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: could not encode output: {}", e),
    }
}

/// Prints the "page X of Y" footer of a listing
fn print_page_footer<T>(list: &ListPage<T>) {
    let page = &list.page;
    if page.is_paginated {
        println!();
        println!("Page {} of {} ({} total)", page.page, page.num_pages, page.total);
    }
}

/// Prints rows as left-aligned columns under a header
fn print_table(header: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let line = |cells: Vec<&str>| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        println!("{}", padded.join("  ").trim_end());
    };

    line(header.to_vec());
    for row in rows {
        line(row.iter().map(String::as_str).collect());
    }
}

/// Prints a listing page: a table in human mode, the raw page in JSON mode
fn print_list<T: Serialize>(
    list: &ListPage<T>,
    config: &OutputConfig,
    noun: &str,
    header: &[&str],
    id: impl Fn(&T) -> String,
    row: impl Fn(&T) -> Vec<String>,
) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                for object in &list.object_list {
                    println!("{}", id(object));
                }
                return;
            }
            if list.object_list.is_empty() {
                if list.search_form.value.is_empty() {
                    println!("No {} found.", noun);
                } else {
                    println!("No {} matching \"{}\".", noun, list.search_form.value);
                }
                return;
            }
            let rows: Vec<Vec<String>> = list.object_list.iter().map(row).collect();
            print_table(header, &rows);
            print_page_footer(list);
        }
        OutputFormat::Json => print_json(list),
    }
}

pub fn print_manufacturers(list: &ListPage<Manufacturer>, config: &OutputConfig) {
    print_list(
        list,
        config,
        "manufacturers",
        &["ID", "NAME", "COUNTRY"],
        Manufacturer::get_id,
        |m| vec![m.get_id(), m.get_name(), m.get_country()],
    );
}

pub fn print_manufacturer(manufacturer: &Manufacturer, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human if config.quiet => println!("{}", manufacturer.get_id()),
        OutputFormat::Human => {
            println!("ID:      {}", manufacturer.get_id());
            println!("Name:    {}", manufacturer.get_name());
            println!("Country: {}", manufacturer.get_country());
        }
        OutputFormat::Json => print_json(manufacturer),
    }
}

pub fn print_cars(list: &ListPage<CarSummary>, config: &OutputConfig) {
    print_list(
        list,
        config,
        "cars",
        &["ID", "MODEL", "MANUFACTURER"],
        |c| c.car.get_id(),
        |c| vec![c.car.get_id(), c.car.get_model(), c.manufacturer.get_name()],
    );
}

pub fn print_car(car: &CarDetail, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human if config.quiet => println!("{}", car.car.get_id()),
        OutputFormat::Human => {
            println!("ID:           {}", car.car.get_id());
            println!("Model:        {}", car.car.get_model());
            println!("Manufacturer: {}", car.manufacturer);
            if car.drivers.is_empty() {
                println!("Drivers:      (none)");
            } else {
                println!("Drivers:");
                for driver in &car.drivers {
                    println!("  {}  {}", driver.get_id(), driver);
                }
            }
        }
        OutputFormat::Json => print_json(car),
    }
}

pub fn print_drivers(list: &ListPage<Driver>, config: &OutputConfig) {
    print_list(
        list,
        config,
        "drivers",
        &["ID", "USERNAME", "NAME", "LICENSE"],
        Driver::get_id,
        |d| {
            let account = d.account();
            vec![
                d.get_id(),
                d.get_username(),
                format!("{} {}", account.get_first_name(), account.get_last_name())
                    .trim()
                    .to_string(),
                d.get_license_number(),
            ]
        },
    );
}

pub fn print_driver(driver: &Driver, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human if config.quiet => println!("{}", driver.get_id()),
        OutputFormat::Human => {
            let account = driver.account();
            println!("ID:       {}", driver.get_id());
            println!("Username: {}", driver.get_username());
            println!("Name:     {} {}", account.get_first_name(), account.get_last_name());
            println!("License:  {}", driver.get_license_number());
            println!("Joined:   {}", account.get_date_joined().format("%Y-%m-%d %H:%M"));
        }
        OutputFormat::Json => print_json(driver),
    }
}

pub fn print_driver_detail(detail: &DriverDetail, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            print_driver(&detail.driver, config);
            if config.quiet {
                return;
            }
            if detail.cars.is_empty() {
                println!("Cars:     (none)");
            } else {
                println!("Cars:");
                for car in &detail.cars {
                    println!("  {}  {} ({})", car.car.get_id(), car.car.get_model(), car.manufacturer.get_name());
                }
            }
        }
        OutputFormat::Json => print_json(detail),
    }
}

pub fn print_index(index: &IndexDto, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            println!("Drivers:       {}", index.num_drivers);
            println!("Cars:          {}", index.num_cars);
            println!("Manufacturers: {}", index.num_manufacturers);
            if !config.quiet {
                println!("Visits:        {}", index.num_visits);
            }
        }
        OutputFormat::Json => print_json(index),
    }
}

/// Prints a success message
pub fn print_success(message: &str, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if !config.quiet {
                println!("{}", message);
            }
        }
        OutputFormat::Json => {
            print_json(&serde_json::json!({"status": "ok", "message": message}));
        }
    }
}
