mod app;
mod audio;
mod config;
mod library;
mod playlist;
mod runtime;
mod state;
mod tags;
mod ui;

#[cfg(test)]
mod test_support;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
