use anyhow::{Context, Result, bail};
use bank::{RawIngredient, Source, compute_estimate};
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(author, version, about = "Estimate a dish's carbon footprint offline")]
struct Args {
    dish: String,

    /// Ingredients as `name` or `name:confidence`
    ingredients: Vec<String>,

    #[arg(long, value_enum, default_value_t = SourceArg::Text)]
    source: SourceArg,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SourceArg {
    Text,
    Image,
}

impl From<SourceArg> for Source {
    fn from(source: SourceArg) -> Self {
        match source {
            SourceArg::Text => Source::Text,
            SourceArg::Image => Source::Image,
        }
    }
}

fn parse_ingredient(input: &str) -> Result<RawIngredient> {
    let Some((name, confidence)) = input.rsplit_once(':') else {
        return Ok(RawIngredient::new(input, None));
    };

    let confidence: f64 = confidence
        .parse()
        .with_context(|| format!("Invalid confidence in {input:?}"))?;

    if !(0.0..=1.0).contains(&confidence) {
        bail!("Confidence must be between 0 and 1, got {confidence}");
    }

    Ok(RawIngredient::new(name, Some(confidence)))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let ingredients = args
        .ingredients
        .iter()
        .map(|input| parse_ingredient(input))
        .collect::<Result<Vec<_>>>()?;

    let estimate = compute_estimate(&args.dish, &ingredients, args.source.into(), None);

    println!("{}", serde_json::to_string_pretty(&estimate)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ingredient() {
        assert_eq!(
            parse_ingredient("rice").unwrap(),
            RawIngredient::new("rice", None)
        );
        assert_eq!(
            parse_ingredient("olive oil:0.9").unwrap(),
            RawIngredient::new("olive oil", Some(0.9))
        );
    }

    #[test]
    fn test_parse_ingredient_errors() {
        assert!(parse_ingredient("rice:high").is_err());
        assert!(parse_ingredient("rice:1.5").is_err());
    }

    #[test]
    fn test_args() {
        let args = Args::try_parse_from([
            "estimate",
            "Chicken Rice",
            "chicken:0.9",
            "rice",
            "--source",
            "image",
        ])
        .unwrap();

        assert_eq!(args.dish, "Chicken Rice");
        assert_eq!(args.ingredients, ["chicken:0.9", "rice"]);
        assert!(matches!(args.source, SourceArg::Image));
    }
}
