use argh::FromArgs;
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use picto::image::Image;
use picto::imgproc::{
    self,
    quantize::{ConvergenceCriteria, KMeansQuantizer, DEFAULT_NUM_CLUSTERS},
};
use picto::io::functional as F;

#[derive(FromArgs, Debug, PartialEq)]
/// Image manipulation from the command line.
struct Args {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs, Debug, PartialEq)]
#[argh(subcommand)]
enum Command {
    Compress(CompressArgs),
    Invert(InvertArgs),
    Grayscale(GrayscaleArgs),
    Darken(DarkenArgs),
    Blur(BlurArgs),
    Rotate(RotateArgs),
    Flip(FlipArgs),
    Blend(BlendArgs),
    Mosaic(MosaicArgs),
}

#[derive(FromArgs, Debug, PartialEq)]
/// Reduce the palette of an image with k-means clustering.
#[argh(subcommand, name = "compress")]
struct CompressArgs {
    /// path to the input image
    #[argh(positional)]
    input: PathBuf,

    /// path to the output image
    #[argh(positional)]
    output: PathBuf,

    /// number of colours to keep
    #[argh(option, short = 'k', default = "DEFAULT_NUM_CLUSTERS")]
    clusters: usize,

    /// maximum number of passes over the image
    #[argh(option, default = "ConvergenceCriteria::default().max_iterations")]
    max_iterations: usize,
}

#[derive(FromArgs, Debug, PartialEq)]
/// Invert the colours of an image.
#[argh(subcommand, name = "invert")]
struct InvertArgs {
    /// path to the input image
    #[argh(positional)]
    input: PathBuf,

    /// path to the output image
    #[argh(positional)]
    output: PathBuf,
}

#[derive(FromArgs, Debug, PartialEq)]
/// Convert an image to gray.
#[argh(subcommand, name = "grayscale")]
struct GrayscaleArgs {
    /// path to the input image
    #[argh(positional)]
    input: PathBuf,

    /// path to the output image
    #[argh(positional)]
    output: PathBuf,
}

#[derive(FromArgs, Debug, PartialEq)]
/// Darken an image by dividing every channel.
#[argh(subcommand, name = "darken")]
struct DarkenArgs {
    /// divisor applied to every channel
    #[argh(positional)]
    magnitude: u8,

    /// path to the input image
    #[argh(positional)]
    input: PathBuf,

    /// path to the output image
    #[argh(positional)]
    output: PathBuf,
}

#[derive(FromArgs, Debug, PartialEq)]
/// Blur an image with a 3x3 box filter.
#[argh(subcommand, name = "blur")]
struct BlurArgs {
    /// path to the input image
    #[argh(positional)]
    input: PathBuf,

    /// path to the output image
    #[argh(positional)]
    output: PathBuf,
}

#[derive(FromArgs, Debug, PartialEq)]
/// Rotate an image clockwise by a multiple of 90 degrees.
#[argh(subcommand, name = "rotate")]
struct RotateArgs {
    /// clockwise angle in degrees
    #[argh(positional)]
    angle: i32,

    /// path to the input image
    #[argh(positional)]
    input: PathBuf,

    /// path to the output image
    #[argh(positional)]
    output: PathBuf,
}

#[derive(Debug, PartialEq, Clone, Copy)]
enum FlipDirection {
    Horizontal,
    Vertical,
}

impl FromStr for FlipDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "H" | "h" => Ok(FlipDirection::Horizontal),
            "V" | "v" => Ok(FlipDirection::Vertical),
            _ => Err(format!("unknown flip direction {s}, expected H or V")),
        }
    }
}

#[derive(FromArgs, Debug, PartialEq)]
/// Mirror an image horizontally (H) or vertically (V).
#[argh(subcommand, name = "flip")]
struct FlipArgs {
    /// flip direction, either H or V
    #[argh(positional)]
    direction: FlipDirection,

    /// path to the input image
    #[argh(positional)]
    input: PathBuf,

    /// path to the output image
    #[argh(positional)]
    output: PathBuf,
}

#[derive(FromArgs, Debug, PartialEq)]
/// Average several images; the last path is the output.
#[argh(subcommand, name = "blend")]
struct BlendArgs {
    /// input images followed by the output path
    #[argh(positional)]
    paths: Vec<PathBuf>,
}

#[derive(FromArgs, Debug, PartialEq)]
/// Tile several images into a mosaic; the last path is the output.
#[argh(subcommand, name = "mosaic")]
struct MosaicArgs {
    /// side of the square tiles in pixels
    #[argh(positional)]
    tile_size: usize,

    /// input images followed by the output path
    #[argh(positional)]
    paths: Vec<PathBuf>,
}

// splits `inputs... output`, requiring at least one input
fn split_output(paths: &[PathBuf]) -> Result<(&[PathBuf], &PathBuf), Box<dyn std::error::Error>> {
    match paths.split_last() {
        Some((output, inputs)) if !inputs.is_empty() => Ok((inputs, output)),
        _ => Err("expected at least one input path followed by an output path".into()),
    }
}

fn read_all(paths: &[PathBuf]) -> Result<Vec<Image<u8, 3>>, Box<dyn std::error::Error>> {
    paths
        .iter()
        .map(|p| F::read_image_any_rgb8(p).map_err(Into::into))
        .collect()
}

// runs a same-size filter `f(src, dst)` from `input` into `output`
fn map_image(
    input: &Path,
    output: &Path,
    f: impl Fn(&Image<u8, 3>, &mut Image<u8, 3>) -> Result<(), picto::image::ImageError>,
) -> Result<(), Box<dyn std::error::Error>> {
    let image = F::read_image_any_rgb8(input)?;
    let mut dst = Image::<u8, 3>::from_size_val(image.size(), 0)?;
    f(&image, &mut dst)?;
    F::write_image_any_rgb8(output, &dst)?;
    Ok(())
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        Command::Compress(cmd) => {
            let image = F::read_image_any_rgb8(&cmd.input)?;
            log::info!("loaded {} from {}", image.size(), cmd.input.display());

            let quantized = KMeansQuantizer::new(cmd.clusters)
                .with_criteria(ConvergenceCriteria {
                    max_iterations: cmd.max_iterations,
                })
                .evaluate(&image)?;

            if !quantized.converged {
                log::warn!(
                    "no fixed point after {} passes, saving the last state",
                    quantized.num_iterations
                );
            }

            F::write_image_any_rgb8(&cmd.output, &quantized.image)?;
            log::info!("saved {}", cmd.output.display());
        }
        Command::Invert(cmd) => map_image(&cmd.input, &cmd.output, imgproc::color::invert)?,
        Command::Grayscale(cmd) => map_image(
            &cmd.input,
            &cmd.output,
            imgproc::color::gray_from_rgb_mean,
        )?,
        Command::Darken(cmd) => map_image(&cmd.input, &cmd.output, |src, dst| {
            imgproc::enhance::darken(src, cmd.magnitude, dst)
        })?,
        Command::Blur(cmd) => map_image(&cmd.input, &cmd.output, imgproc::filter::box_blur3x3)?,
        Command::Rotate(cmd) => {
            let image = F::read_image_any_rgb8(&cmd.input)?;
            let rotated = imgproc::warp::rotate90(&image, cmd.angle)?;
            F::write_image_any_rgb8(&cmd.output, &rotated)?;
        }
        Command::Flip(cmd) => match cmd.direction {
            FlipDirection::Horizontal => {
                map_image(&cmd.input, &cmd.output, imgproc::flip::horizontal_flip::<u8, 3>)?
            }
            FlipDirection::Vertical => {
                map_image(&cmd.input, &cmd.output, imgproc::flip::vertical_flip::<u8, 3>)?
            }
        },
        Command::Blend(cmd) => {
            let (inputs, output) = split_output(&cmd.paths)?;
            let blended = imgproc::blend::blend(&read_all(inputs)?)?;
            F::write_image_any_rgb8(output, &blended)?;
        }
        Command::Mosaic(cmd) => {
            let (inputs, output) = split_output(&cmd.paths)?;
            let tiled = imgproc::blend::mosaic(&read_all(inputs)?, cmd.tile_size)?;
            F::write_image_any_rgb8(output, &tiled)?;
        }
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();
    run(args)
}
