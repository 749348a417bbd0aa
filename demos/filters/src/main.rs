use argh::FromArgs;
use rand::{rngs::StdRng, SeedableRng};
use std::path::{Path, PathBuf};

use kernelfx::{
    image::{ImageSize, PixelBuffer},
    imgproc::{
        self,
        effects::CartoonParams,
        filter::{Kernel, KernelFamily, KernelSpec},
        parallel::{CancelToken, ExecutionStrategy},
        BorderFill, FilterOptions,
    },
};

#[derive(FromArgs)]
/// Apply a kernel filter or effect to an image file
struct Args {
    /// path to the input image
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to the output image
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// the filter to apply: gaussian, gaussian-sigma, mean, low-pass, sharpen,
    /// sobel-x, sobel-y, sobel, median, oil-paint, posterize, cartoon, noise,
    /// salt-pepper or custom
    #[argh(option, short = 'f')]
    filter: String,

    /// the kernel or window size
    #[argh(option, short = 'k', default = "3")]
    size: usize,

    /// sigma for gaussian-sigma and noise
    #[argh(option, default = "1.5")]
    sigma: f64,

    /// intensity levels for oil-paint, posterize and cartoon
    #[argh(option, default = "8")]
    levels: usize,

    /// pixel density for salt-pepper
    #[argh(option, default = "0.05")]
    density: f64,

    /// seed of the random source used by the noise filters
    #[argh(option, default = "0")]
    seed: u64,

    /// json file with a kernel spec for the custom filter
    #[argh(option)]
    kernel_file: Option<PathBuf>,

    /// do not normalize the custom kernel by its weight sum
    #[argh(switch)]
    no_normalize: bool,

    /// run on a local pool with this many threads
    #[argh(option)]
    threads: Option<usize>,

    /// run on the current thread only
    #[argh(switch)]
    serial: bool,

    /// fill the unprocessed border with black
    #[argh(switch)]
    zero_border: bool,
}

fn load_image(path: &Path) -> Result<PixelBuffer, Box<dyn std::error::Error>> {
    let rgb = image::open(path)?.to_rgb8();
    let size = ImageSize {
        width: rgb.width() as usize,
        height: rgb.height() as usize,
    };
    Ok(PixelBuffer::from_rgb_packed(size, rgb.as_raw())?)
}

fn save_image(path: &Path, img: &PixelBuffer) -> Result<(), Box<dyn std::error::Error>> {
    let rgb = image::RgbImage::from_raw(
        img.width() as u32,
        img.height() as u32,
        img.to_rgb_packed(),
    )
    .ok_or("output buffer does not match the image size")?;
    rgb.save(path)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    let strategy = match (args.serial, args.threads) {
        (true, _) => ExecutionStrategy::Serial,
        (false, Some(n)) => ExecutionStrategy::Fixed(n),
        (false, None) => ExecutionStrategy::ParallelRows,
    };
    let border = if args.zero_border {
        BorderFill::Zero
    } else {
        BorderFill::Source
    };

    // create a cancel token to stop a long running pass
    let cancel_token = CancelToken::new();

    ctrlc::set_handler({
        let cancel_token = cancel_token.clone();
        move || {
            log::warn!("Received Ctrl-C signal. Cancelling the filter.");
            cancel_token.cancel();
        }
    })?;

    let options = FilterOptions::new()
        .with_strategy(strategy)
        .with_border(border)
        .with_cancel_token(cancel_token);

    let src = load_image(&args.input)?;
    log::info!("loaded {} ({})", args.input.display(), src.size());

    let mut rng = StdRng::seed_from_u64(args.seed);

    let dst = match args.filter.to_lowercase().as_str() {
        "gaussian-sigma" => {
            imgproc::filter::gaussian_blur_sigma(&src, args.size, args.sigma, &options)?
        }
        "sobel" => imgproc::filter::sobel_magnitude(&src, args.size, &options)?,
        "median" => imgproc::filter::median_blur(&src, args.size, &options)?,
        "oil-paint" => imgproc::effects::oil_paint(&src, args.size, args.levels, &options)?,
        "posterize" => imgproc::effects::posterize(&src, args.levels, &options)?,
        "cartoon" => {
            let params = CartoonParams {
                smooth_size: args.size,
                levels: args.levels,
                ..Default::default()
            };
            imgproc::effects::cartoon(&src, params, &options)?
        }
        "noise" => imgproc::noise::add_gaussian_noise(&src, args.sigma, &mut rng)?,
        "salt-pepper" => imgproc::noise::add_salt_and_pepper(&src, args.density, &mut rng)?,
        "custom" => {
            let path = args
                .kernel_file
                .as_ref()
                .ok_or("the custom filter needs --kernel-file")?;
            let spec: KernelSpec = serde_json::from_str(&std::fs::read_to_string(path)?)?;
            let normalize = spec.normalize && !args.no_normalize;
            let kernel = Kernel::try_from(spec)?;
            imgproc::filter::convolve(&src, &kernel, normalize, &options)?
        }
        name => {
            let family: KernelFamily = name.parse()?;
            imgproc::filter::apply_catalog_kernel(&src, family, args.size, &options)?
        }
    };

    save_image(&args.output, &dst)?;
    log::info!("wrote {} with {}", args.output.display(), args.filter);

    Ok(())
}
