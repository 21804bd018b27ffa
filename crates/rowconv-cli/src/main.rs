use argh::FromArgs;
use std::process::ExitCode;
use std::time::Instant;

use rowconv_image::Raster;
use rowconv_imgproc::{color, filter};
use rowconv_io::functional as F;

#[derive(FromArgs)]
/// Apply a horizontal Sobel filter to an image, splitting the rows between workers
struct Args {
    /// path to an input image
    #[argh(positional)]
    image_path: String,

    /// the number of workers to split the rows between
    #[argh(positional)]
    num_workers: usize,
}

// argh exits with status 1 on its own, the tool reports bad usage with 255
fn parse_args() -> Result<Args, ExitCode> {
    let strings = std::env::args().collect::<Vec<_>>();
    let cmd = strings.first().map_or("rowconv", String::as_str);
    let rest = strings.iter().skip(1).map(String::as_str).collect::<Vec<_>>();

    Args::from_args(&[cmd], &rest).map_err(|early_exit| match early_exit.status {
        Ok(()) => {
            println!("{}", early_exit.output);
            ExitCode::SUCCESS
        }
        Err(()) => {
            println!("{}", early_exit.output.trim_end());
            println!("Usage: {cmd} <input_image> <num_workers>");
            ExitCode::from(255)
        }
    })
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    // read the image and convert it to grayscale
    let rgb = F::read_image_any_rgb8(&args.image_path)?;
    let mut gray = Raster::zeros(rgb.size())?;
    color::gray_from_rgb_u8(&rgb, &mut gray)?;
    log::info!("read {} ({})", args.image_path, gray.size());

    let output_path = F::output_file_name(&args.image_path)?;

    let now = Instant::now();
    let edges = filter::sobel_x_partitioned(&gray, args.num_workers)?;
    let elapsed = now.elapsed();

    println!("Execution Time: {} seconds", elapsed.as_secs_f64());

    F::write_image_mono8(&output_path, &edges)?;
    println!("Output saved as: {output_path}");

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(code) => return code,
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(255)
        }
    }
}
