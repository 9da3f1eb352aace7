// src/console.rs

//! Interactive console.
//!
//! Asks for a state, prints its numbered sites, then asks for a site number to
//! search nearby places. `back` returns to the state prompt and `exit` quits
//! from either prompt. A failed operation is reported and the prompt repeats.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::error::Result;
use crate::models::{DirectoryIndex, FacilityRecord, NearbyPlaces};
use crate::pipeline::Explorer;

const REGION_PROMPT: &str = "Enter a state name (e.g. Michigan, michigan), or 'exit' to quit: ";
const SELECTION_PROMPT: &str = "Choose the number for detail search or 'exit' or 'back': ";
const RULE: &str = "----------------------------------------";

/// Answer to the state prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionInput {
    Exit,
    /// Lower-cased region name
    Region(String),
}

impl RegionInput {
    pub fn parse(line: &str) -> Self {
        let input = line.trim().to_lowercase();
        if input == "exit" {
            Self::Exit
        } else {
            Self::Region(input)
        }
    }
}

/// Answer to the site-number prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionInput {
    Exit,
    Back,
    /// 1-based site number within range
    Pick(usize),
    Invalid,
}

impl SelectionInput {
    /// Parse a line against a listing of `count` sites.
    pub fn parse(line: &str, count: usize) -> Self {
        let input = line.trim();
        if input.eq_ignore_ascii_case("exit") {
            return Self::Exit;
        }
        if input.eq_ignore_ascii_case("back") {
            return Self::Back;
        }
        match input.parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => Self::Pick(n),
            _ => Self::Invalid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Back,
    Exit,
}

/// Numbered listing of a region's sites.
pub fn write_listing(out: &mut impl Write, region: &str, sites: &[FacilityRecord]) -> Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "List of national sites in {region}")?;
    writeln!(out, "{RULE}")?;
    for (i, site) in sites.iter().enumerate() {
        writeln!(out, "[{}] {}", i + 1, site.info())?;
    }
    writeln!(out)?;
    Ok(())
}

/// Nearby places for a site, or why there are none.
pub fn write_places(out: &mut impl Write, site: &FacilityRecord, places: &NearbyPlaces) -> Result<()> {
    if places.is_empty() {
        if site.postal_code.is_none() {
            writeln!(
                out,
                "This site did not contain a zip code. Therefore we could not find any nearby places. Please try again!"
            )?;
        } else {
            writeln!(
                out,
                "There are no nearby places within the radius of the site. Please try again"
            )?;
        }
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "{RULE}")?;
    writeln!(out, "Places near {}", site.name)?;
    writeln!(out, "{RULE}")?;
    for description in places.descriptions() {
        writeln!(out, "- {description}")?;
    }
    writeln!(out)?;
    Ok(())
}

/// Line-oriented console over any async input and sync output.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until `exit` or end of input. Both end with `Bye!`.
    pub async fn run(&mut self, explorer: &mut Explorer<'_>, directory: &DirectoryIndex) -> Result<()> {
        loop {
            let Some(line) = self.prompt(REGION_PROMPT).await? else {
                return self.bye();
            };

            let region = match RegionInput::parse(&line) {
                RegionInput::Exit => return self.bye(),
                RegionInput::Region(region) => region,
            };

            let Some(url) = directory.get(&region) else {
                writeln!(self.output, "[Error] Enter proper state name")?;
                writeln!(self.output)?;
                continue;
            };

            let sites = match explorer.facilities(url).await {
                Ok(sites) => sites,
                Err(e) => {
                    log::error!("Failed to list sites for {}: {}", region, e);
                    writeln!(self.output, "[Error] {e}")?;
                    continue;
                }
            };
            write_listing(&mut self.output, &region, &sites)?;

            if self.select(explorer, &sites).await? == Flow::Exit {
                return self.bye();
            }
        }
    }

    async fn select(&mut self, explorer: &mut Explorer<'_>, sites: &[FacilityRecord]) -> Result<Flow> {
        loop {
            let Some(line) = self.prompt(SELECTION_PROMPT).await? else {
                return Ok(Flow::Exit);
            };

            match SelectionInput::parse(&line, sites.len()) {
                SelectionInput::Exit => return Ok(Flow::Exit),
                SelectionInput::Back => return Ok(Flow::Back),
                SelectionInput::Invalid => {
                    writeln!(self.output, "[Error] Invalid Input")?;
                    writeln!(self.output)?;
                }
                SelectionInput::Pick(n) => {
                    let site = &sites[n - 1];
                    match explorer.nearby(site).await {
                        Ok(places) => write_places(&mut self.output, site, &places)?,
                        Err(e) => {
                            log::error!("Nearby search failed for {}: {}", site.name, e);
                            writeln!(self.output, "[Error] {e}")?;
                        }
                    }
                }
            }
        }
    }

    /// Print `text` and read one line; `None` at end of input.
    async fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        writeln!(self.output)?;
        Ok(Some(line))
    }

    fn bye(&mut self) -> Result<()> {
        writeln!(self.output, "Bye!")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_input() {
        assert_eq!(RegionInput::parse(" EXIT \n"), RegionInput::Exit);
        assert_eq!(
            RegionInput::parse("Michigan\n"),
            RegionInput::Region("michigan".to_string())
        );
    }

    #[test]
    fn test_selection_input() {
        assert_eq!(SelectionInput::parse("2\n", 3), SelectionInput::Pick(2));
        assert_eq!(SelectionInput::parse("back", 3), SelectionInput::Back);
        assert_eq!(SelectionInput::parse("Exit", 3), SelectionInput::Exit);
        assert_eq!(SelectionInput::parse("0", 3), SelectionInput::Invalid);
        assert_eq!(SelectionInput::parse("4", 3), SelectionInput::Invalid);
        assert_eq!(SelectionInput::parse("-1", 3), SelectionInput::Invalid);
        assert_eq!(SelectionInput::parse("two", 3), SelectionInput::Invalid);
    }

    #[test]
    fn test_selection_on_empty_listing() {
        assert_eq!(SelectionInput::parse("1", 0), SelectionInput::Invalid);
    }

    fn site(postal_code: Option<&str>) -> FacilityRecord {
        FacilityRecord {
            category: "National Park".to_string(),
            name: "Isle Royale".to_string(),
            address: "Houghton, MI".to_string(),
            postal_code: postal_code.map(str::to_string),
            phone: "(906) 482-0984".to_string(),
        }
    }

    #[test]
    fn test_write_listing_numbers_from_one() {
        let mut out = Vec::new();
        write_listing(&mut out, "michigan", &[site(Some("49931")), site(None)]).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("List of national sites in michigan"));
        assert!(text.contains("[1] Isle Royale (National Park): Houghton, MI 49931"));
        assert!(text.contains("[2] Isle Royale (National Park): Houghton, MI No Zip"));
    }

    #[test]
    fn test_write_places() {
        let mut out = Vec::new();
        let places = NearbyPlaces::ranked(["Cafe (Restaurants): 1 Main St, Houghton"]);
        write_places(&mut out, &site(Some("49931")), &places).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Places near Isle Royale"));
        assert!(text.contains("- Cafe (Restaurants): 1 Main St, Houghton"));
    }

    #[test]
    fn test_write_places_explains_missing_zip() {
        let mut out = Vec::new();
        write_places(&mut out, &site(None), &NearbyPlaces::new()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("did not contain a zip code"));
    }

    #[test]
    fn test_write_places_explains_no_results() {
        let mut out = Vec::new();
        write_places(&mut out, &site(Some("49931")), &NearbyPlaces::new()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("no nearby places within the radius"));
    }
}
