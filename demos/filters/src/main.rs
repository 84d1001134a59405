use argh::FromArgs;
use std::path::PathBuf;

use stencil::{
    image::{ops, Image, ImageSize},
    imgproc::{
        border::Border,
        filter::{self, Filter, SobelDirection},
    },
};

#[derive(FromArgs)]
/// Apply a convolution filter to an image file
struct Args {
    /// path to the input image
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to the output image
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// the filter to apply: gaussian-blur, gaussian, box, sobel-x, sobel-y or sobel
    #[argh(option, default = "String::from(\"gaussian-blur\")")]
    filter: String,

    /// the sigma for the gaussian filters
    #[argh(option, default = "1.0")]
    sigma: f64,

    /// the radius for the gaussian and box filters
    #[argh(option, default = "1")]
    radius: usize,

    /// the border policy: edge, reflect, symmetric, wrap or zero
    #[argh(option, default = "String::from(\"edge\")")]
    border: String,
}

fn parse_border(name: &str) -> Result<Border<f32, 3>, String> {
    match name.to_lowercase().as_str() {
        "edge" => Ok(Border::Edge),
        "reflect" => Ok(Border::Reflect),
        "symmetric" => Ok(Border::Symmetric),
        "wrap" => Ok(Border::Wrap),
        "zero" => Ok(Border::Fill([0.0; 3])),
        _ => Err(format!("Invalid border: {name}")),
    }
}

fn build_filter(
    args: &Args,
    border: Border<f32, 3>,
) -> Result<Filter<f32, 3>, Box<dyn std::error::Error>> {
    let size = 2 * args.radius + 1;
    let filter = match args.filter.to_lowercase().as_str() {
        "gaussian-blur" => filter::gaussian_blur(args.sigma)?,
        "gaussian" => filter::gaussian_low_pass(args.radius, args.sigma, border)?,
        "box" => filter::box_blur((size, size), border)?,
        "sobel-x" => filter::sobel_filter(SobelDirection::Horizontal, border)?,
        "sobel-y" => filter::sobel_filter(SobelDirection::Vertical, border)?,
        "sobel" => Filter::new(filter::sobel_operator::<f32, 3>),
        _ => return Err(format!("Invalid filter: {}", args.filter).into()),
    };
    Ok(filter)
}

/// Rescale gradient images so the largest magnitude maps to one.
fn normalize_abs_max(img: &mut Image<f32, 3>) {
    let max = img.as_slice().iter().fold(0.0f32, |m, v| m.max(v.abs()));
    if max > 0.0 {
        img.as_slice_mut().iter_mut().for_each(|v| *v = v.abs() / max);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let rgb = image::open(&args.input)?.to_rgb8();
    let size = ImageSize {
        width: rgb.width() as usize,
        height: rgb.height() as usize,
    };
    log::info!("loaded {} from {}", size, args.input.display());

    let img_u8 = Image::<u8, 3>::new(size, rgb.into_raw())?;
    let mut img_f32 = Image::<f32, 3>::from_size_val(size, 0.0)?;
    ops::cast_and_scale(&img_u8, &mut img_f32, 1. / 255.)?;

    let border = parse_border(&args.border)?;
    let filter = build_filter(&args, border)?;
    log::info!("applying {} with border {:?}", args.filter, border);

    let mut filtered = filter.apply(&img_f32)?;
    if args.filter.to_lowercase().starts_with("sobel") {
        normalize_abs_max(&mut filtered);
    }

    let data = filtered
        .as_slice()
        .iter()
        .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect();
    let out = image::RgbImage::from_raw(size.width as u32, size.height as u32, data)
        .ok_or("output buffer does not match the image size")?;
    out.save(&args.output)?;

    log::info!("wrote {}", args.output.display());

    Ok(())
}
