//! Readers for vessel profiles and container manifests.
//!
//! Two profile formats are understood. The CSV form carries a header row and
//! a single data row with every profile field. The text form (`.txt` /
//! `.dat`) holds one line `bays stacks tiers tolerance` followed by an
//! optional `## HydroPoints` table; it has no weight limit, so the stack
//! weight limit is set to a large sentinel and both cell capacities equal
//! the tier count.
//!
//! Manifests are CSV files with an `id, type, weight` header, one container
//! per row, in loading order. Legacy Portuguese headers are accepted as
//! aliases in both formats.
//!
//! Container instance files describe a manifest by type rather than by
//! weight: a table of `tid length weight _` transport types, then a
//! `# Container` block whose lines name each container's type id in the
//! third column. [`ContainerGenerator::generate_sequence`] turns such an
//! instance into a concrete manifest.
//!
//! [`ContainerGenerator::generate_sequence`]: crate::generator::ContainerGenerator::generate_sequence

use std::collections::HashMap;
use std::fmt::{self, Display};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use crate::error::StowageError;
use crate::generator::TransportType;
use crate::model::{Container, HydroPoint, LengthClass, VesselProfile};

/// Stack weight limit used for profiles whose format carries none.
pub const UNBOUNDED_STACK_WEIGHT: f64 = 999_999.0;

/// The error type for profile and manifest loading.
#[derive(Debug)]
pub enum LoadError {
    /// An I/O error occurred while reading the input.
    Io(std::io::Error),
    /// The file extension is not a known profile format.
    UnsupportedFormat(String),
    /// A required column, row or line is absent.
    MissingField(String),
    /// A value could not be parsed into the expected type.
    Parse(ParseTokenError),
    /// The values parsed but describe an invalid vessel.
    InvalidProfile(StowageError),
}

/// Details about a failed value parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTokenError {
    /// The field being parsed.
    pub field: String,
    /// The offending text.
    pub token: String,
    /// 1-based line number in the input.
    pub line: usize,
}

impl Display for ParseTokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not parse '{}' for field '{}' on line {}",
            self.token, self.field, self.line
        )
    }
}

impl std::error::Error for ParseTokenError {}

impl Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnsupportedFormat(ext) => write!(f, "unsupported profile format '{ext}'"),
            Self::MissingField(name) => write!(f, "missing {name}"),
            Self::Parse(e) => write!(f, "parse error: {e}"),
            Self::InvalidProfile(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::InvalidProfile(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseTokenError> for LoadError {
    fn from(e: ParseTokenError) -> Self {
        Self::Parse(e)
    }
}

impl From<StowageError> for LoadError {
    fn from(e: StowageError) -> Self {
        Self::InvalidProfile(e)
    }
}

fn parse_value<T: FromStr>(field: &str, token: &str, line: usize) -> Result<T, ParseTokenError> {
    token.trim().parse().map_err(|_| ParseTokenError {
        field: field.to_string(),
        token: token.trim().to_string(),
        line,
    })
}

/// A parsed CSV table: lower-cased header names mapped to column indices,
/// plus the data rows with their 1-based line numbers.
struct CsvTable<'a> {
    columns: HashMap<String, usize>,
    rows: Vec<(usize, Vec<&'a str>)>,
}

impl<'a> CsvTable<'a> {
    fn parse(text: &'a str) -> Result<Self, LoadError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty());

        let (_, header) = lines
            .next()
            .ok_or_else(|| LoadError::MissingField("header row".into()))?;
        let columns = header
            .split(',')
            .enumerate()
            .map(|(i, name)| (name.trim().to_ascii_lowercase(), i))
            .collect();
        let rows = lines
            .map(|(n, l)| (n, l.split(',').map(str::trim).collect::<Vec<_>>()))
            .collect();
        Ok(Self { columns, rows })
    }

    /// Index of the first column matching one of `names`.
    fn column(&self, names: &[&str]) -> Result<usize, LoadError> {
        names
            .iter()
            .find_map(|n| self.columns.get(*n).copied())
            .ok_or_else(|| LoadError::MissingField(format!("column '{}'", names[0])))
    }

    fn field<T: FromStr>(
        &self,
        row: &(usize, Vec<&str>),
        names: &[&str],
    ) -> Result<T, LoadError> {
        let idx = self.column(names)?;
        let (line, values) = row;
        let token = values
            .get(idx)
            .ok_or_else(|| LoadError::MissingField(format!("value '{}' on line {line}", names[0])))?;
        Ok(parse_value(names[0], token, *line)?)
    }
}

/// Loads a vessel profile, choosing the format from the file extension.
pub fn load_vessel_profile<P: AsRef<Path>>(path: P) -> Result<VesselProfile, LoadError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "csv" => parse_profile_csv(&fs::read_to_string(path)?),
        "txt" | "dat" => parse_profile_txt(&fs::read_to_string(path)?),
        _ => Err(LoadError::UnsupportedFormat(ext)),
    }
}

/// Parses a CSV vessel profile (header plus one data row).
pub fn parse_profile_csv(text: &str) -> Result<VesselProfile, LoadError> {
    let table = CsvTable::parse(text)?;
    let row = table
        .rows
        .first()
        .ok_or_else(|| LoadError::MissingField("profile data row".into()))?;

    let profile = VesselProfile {
        bays: table.field(row, &["bays", "num_baias"])?,
        stacks: table.field(row, &["stacks", "num_pilhas"])?,
        max_tier_height: table.field(row, &["max_tier_height", "altura_max"])?,
        capacity_20ft: table.field(row, &["capacity_20ft", "capacidade_20ft"])?,
        capacity_40ft: table.field(row, &["capacity_40ft", "capacidade_40ft"])?,
        max_stack_weight: table.field(row, &["max_stack_weight", "peso_max_pilha"])?,
        long_cg_tolerance: table.field(row, &["long_cg_tolerance", "limite_grav_long"])?,
        trans_cg_tolerance: table.field(row, &["trans_cg_tolerance", "limite_grav_trans"])?,
        hydrostatics: Vec::new(),
    };
    profile.validate()?;
    Ok(profile)
}

fn is_numeric(token: &str) -> bool {
    !token.is_empty()
        && token.matches('.').count() <= 1
        && token.chars().all(|c| c.is_ascii_digit() || c == '.')
        && token.chars().any(|c| c.is_ascii_digit())
}

/// Parses a text vessel profile with an optional `## HydroPoints` table.
pub fn parse_profile_txt(text: &str) -> Result<VesselProfile, LoadError> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
        .collect();

    let (line, head) = lines
        .iter()
        .filter(|(_, l)| !l.starts_with('#'))
        .map(|&(n, l)| (n, l.split_whitespace().collect::<Vec<_>>()))
        .find(|(_, parts)| parts.len() >= 4 && parts[..4].iter().all(|p| is_numeric(p)))
        .ok_or_else(|| LoadError::MissingField("profile line".into()))?;

    let bays: usize = parse_value("bays", head[0], line)?;
    let stacks: usize = parse_value("stacks", head[1], line)?;
    let tiers: usize = parse_value("tiers", head[2], line)?;
    let tolerance: f64 = parse_value("tolerance", head[3], line)?;

    let mut hydrostatics = Vec::new();
    if let Some(start) = lines.iter().position(|(_, l)| l.starts_with("## HydroPoints")) {
        for &(n, l) in lines[start + 1..].iter().take_while(|(_, l)| !l.starts_with("##")) {
            let parts: Vec<&str> = l.split_whitespace().collect();
            if parts.len() < 4 {
                continue;
            }
            hydrostatics.push(HydroPoint {
                displacement: parse_value("displacement", parts[0], n)?,
                min_lcg: parse_value("min_lcg", parts[1], n)?,
                max_lcg: parse_value("max_lcg", parts[2], n)?,
                metacenter: parse_value("metacenter", parts[3], n)?,
            });
        }
    }

    let profile = VesselProfile::new(bays, stacks, tiers)
        .with_cell_capacity(tiers, tiers)
        .with_max_stack_weight(UNBOUNDED_STACK_WEIGHT)
        .with_cg_tolerances(tolerance, tolerance)
        .with_hydrostatics(hydrostatics);
    profile.validate()?;
    Ok(profile)
}

/// Loads a container manifest from a CSV file.
pub fn load_containers<P: AsRef<Path>>(path: P) -> Result<Vec<Container>, LoadError> {
    parse_containers_csv(&fs::read_to_string(path)?)
}

/// Parses a container manifest, preserving row order.
pub fn parse_containers_csv(text: &str) -> Result<Vec<Container>, LoadError> {
    let table = CsvTable::parse(text)?;
    table
        .rows
        .iter()
        .map(|row| {
            let id: u32 = table.field(row, &["id"])?;
            let length_class: LengthClass = table.field(row, &["type", "tipo", "length_class"])?;
            let weight: u32 = table.field(row, &["weight", "peso"])?;
            if weight == 0 {
                return Err(LoadError::Parse(ParseTokenError {
                    field: "weight".into(),
                    token: "0".into(),
                    line: row.0,
                }));
            }
            Ok(Container::new(id, length_class, weight))
        })
        .collect()
}

/// Writes a manifest in the format read by [`parse_containers_csv`].
pub fn write_containers_csv<W: Write>(containers: &[Container], w: &mut W) -> io::Result<()> {
    writeln!(w, "id,type,weight")?;
    for c in containers {
        writeln!(w, "{},{},{}", c.id.0, c.length_class, c.weight)?;
    }
    Ok(())
}

/// A container instance file: the transport types it declares and the type
/// of every container line, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerInstance {
    /// Transport types keyed by type id.
    pub transport_types: HashMap<u32, TransportType>,
    /// Type id of each container line. Lines naming an undeclared type are
    /// not listed.
    pub container_types: Vec<u32>,
}

impl ContainerInstance {
    /// The transport type of each container, in file order.
    pub fn type_sequence(&self) -> Vec<TransportType> {
        self.container_types
            .iter()
            .filter_map(|tid| self.transport_types.get(tid).copied())
            .collect()
    }
}

const CONTAINER_BLOCK: &str = "# Container";

/// Loads a container instance file.
pub fn load_container_instance<P: AsRef<Path>>(path: P) -> Result<ContainerInstance, LoadError> {
    parse_container_instance(&fs::read_to_string(path)?)
}

/// Parses a container instance.
///
/// Transport types are read from the lines before the first `# Container`
/// header; only lines of exactly four tokens starting with an integer id
/// count. The container block then runs until the first blank or `#` line.
/// Lines with fewer than three tokens are ignored, as are lines whose type
/// id was never declared.
pub fn parse_container_instance(text: &str) -> Result<ContainerInstance, LoadError> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .collect();
    let block = lines
        .iter()
        .position(|(_, l)| l.starts_with(CONTAINER_BLOCK))
        .unwrap_or(lines.len());

    let mut transport_types = HashMap::new();
    for &(n, l) in &lines[..block] {
        if l.is_empty() || l.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = l.split_whitespace().collect();
        if parts.len() != 4 || !parts[0].chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        let tid: u32 = parse_value("type id", parts[0], n)?;
        let length_class: LengthClass = parse_value("length", parts[1], n)?;
        let nominal_weight: u32 = parse_value("nominal weight", parts[2], n)?;
        transport_types.insert(tid, TransportType::new(length_class, nominal_weight));
    }

    let mut container_types = Vec::new();
    for &(n, l) in lines.iter().skip(block + 1) {
        if l.is_empty() || l.starts_with('#') {
            break;
        }
        let parts: Vec<&str> = l.split_whitespace().collect();
        if parts.len() < 3 {
            continue;
        }
        let tid: u32 = parse_value("type id", parts[2], n)?;
        if transport_types.contains_key(&tid) {
            container_types.push(tid);
        }
    }

    Ok(ContainerInstance {
        transport_types,
        container_types,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE_CSV: &str = "\
bays,stacks,max_tier_height,capacity_20ft,capacity_40ft,max_stack_weight,long_cg_tolerance,trans_cg_tolerance
10,6,5,5,3,120000,0.2,0.15
";

    const PROFILE_TXT: &str = "\
# Vessel S
# bays stacks tiers tolerance
12 8 6 0.25

## HydroPoints
1000 10.5 12.0 3.2
2000.5 11.0 12.5 3.4
## End
9 9 9 9
";

    #[test]
    fn test_parse_profile_csv() {
        let p = parse_profile_csv(PROFILE_CSV).unwrap();
        assert_eq!((p.bays, p.stacks, p.max_tier_height), (10, 6, 5));
        assert_eq!(p.cell_capacity(LengthClass::Forty), 3);
        assert_eq!(p.max_stack_weight, 120_000.0);
        assert_eq!(p.long_cg_tolerance, 0.2);
        assert_eq!(p.trans_cg_tolerance, 0.15);
        assert!(p.hydrostatics.is_empty());
    }

    #[test]
    fn test_parse_profile_csv_legacy_headers() {
        let text = "num_baias,num_pilhas,altura_max,capacidade_20ft,capacidade_40ft,peso_max_pilha,limite_grav_long,limite_grav_trans\n4,3,2,2,2,500,0.3,0.3\n";
        let p = parse_profile_csv(text).unwrap();
        assert_eq!((p.bays, p.stacks, p.max_tier_height), (4, 3, 2));
        assert_eq!(p.max_stack_weight, 500.0);
    }

    #[test]
    fn test_parse_profile_csv_missing_column() {
        let text = "bays,stacks\n1,2\n";
        assert!(matches!(
            parse_profile_csv(text),
            Err(LoadError::MissingField(_))
        ));
    }

    #[test]
    fn test_parse_profile_csv_bad_value() {
        let text = PROFILE_CSV.replace("10,6", "ten,6");
        match parse_profile_csv(&text) {
            Err(LoadError::Parse(e)) => {
                assert_eq!(e.field, "bays");
                assert_eq!(e.token, "ten");
                assert_eq!(e.line, 2);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_profile_csv_invalid_profile() {
        let text = PROFILE_CSV.replace("0.2,0.15", "1.2,0.15");
        assert!(matches!(
            parse_profile_csv(&text),
            Err(LoadError::InvalidProfile(StowageError::InvalidProfile(_)))
        ));
    }

    #[test]
    fn test_parse_profile_txt() {
        let p = parse_profile_txt(PROFILE_TXT).unwrap();
        assert_eq!((p.bays, p.stacks, p.max_tier_height), (12, 8, 6));
        assert_eq!((p.capacity_20ft, p.capacity_40ft), (6, 6));
        assert_eq!(p.max_stack_weight, UNBOUNDED_STACK_WEIGHT);
        assert_eq!(p.long_cg_tolerance, 0.25);
        assert_eq!(p.trans_cg_tolerance, 0.25);
        assert_eq!(p.hydrostatics.len(), 2);
        assert_eq!(p.hydrostatics[1].displacement, 2000.5);
        assert_eq!(p.hydrostatics[1].metacenter, 3.4);
    }

    #[test]
    fn test_parse_profile_txt_without_profile_line() {
        let text = "# only comments\nfoo bar baz qux\n";
        assert!(matches!(
            parse_profile_txt(text),
            Err(LoadError::MissingField(_))
        ));
    }

    #[test]
    fn test_load_unsupported_extension() {
        assert!(matches!(
            load_vessel_profile("vessel.json"),
            Err(LoadError::UnsupportedFormat(ext)) if ext == "json"
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_vessel_profile("/nonexistent/vessel.csv"),
            Err(LoadError::Io(_))
        ));
    }

    #[test]
    fn test_parse_containers_csv() {
        let text = "id,type,weight\n3,20ft,1500\n1,40ft,2800\n2,20ft,900\n";
        let containers = parse_containers_csv(text).unwrap();
        assert_eq!(
            containers,
            vec![
                Container::new(3, LengthClass::Twenty, 1500),
                Container::new(1, LengthClass::Forty, 2800),
                Container::new(2, LengthClass::Twenty, 900),
            ]
        );
    }

    #[test]
    fn test_parse_containers_legacy_headers() {
        let text = "id,tipo,peso\n0,40ft,10\n";
        let containers = parse_containers_csv(text).unwrap();
        assert_eq!(containers, vec![Container::new(0, LengthClass::Forty, 10)]);
    }

    #[test]
    fn test_parse_containers_rejects_bad_rows() {
        assert!(parse_containers_csv("id,type,weight\n0,45ft,10\n").is_err());
        assert!(parse_containers_csv("id,type,weight\n0,20ft,0\n").is_err());
        assert!(parse_containers_csv("id,type,weight\n0,20ft\n").is_err());
    }

    #[test]
    fn test_parse_containers_empty_manifest() {
        assert!(parse_containers_csv("id,type,weight\n").unwrap().is_empty());
        assert!(matches!(
            parse_containers_csv(""),
            Err(LoadError::MissingField(_))
        ));
    }

    const INSTANCE_TXT: &str = "\
# Transport types
# tid length weight count
1 20 14000 3
2 40 26000 2
7 45 30000 1

# Containers
0 A 2 x
1 B 1 x
2 C 9 x
3 D 1
short 1
4 E 2 x
# Something else
5 F 1 x
";

    #[test]
    fn test_parse_container_instance_types() {
        let err = parse_container_instance(INSTANCE_TXT).unwrap_err();
        // length 45 is not a known class
        assert!(matches!(err, LoadError::Parse(ref e) if e.field == "length" && e.line == 5));

        let text = INSTANCE_TXT.replace("7 45 30000 1\n", "");
        let inst = parse_container_instance(&text).unwrap();
        assert_eq!(inst.transport_types.len(), 2);
        assert_eq!(
            inst.transport_types[&2],
            TransportType::new(LengthClass::Forty, 26000)
        );
    }

    #[test]
    fn test_parse_container_instance_keeps_line_order() {
        let text = INSTANCE_TXT.replace("7 45 30000 1\n", "");
        let inst = parse_container_instance(&text).unwrap();
        // type 9 is undeclared, "short 1" has too few tokens, and the block
        // stops at "# Something else"
        assert_eq!(inst.container_types, vec![2, 1, 1, 2]);
        let classes: Vec<LengthClass> = inst
            .type_sequence()
            .iter()
            .map(|t| t.length_class)
            .collect();
        assert_eq!(
            classes,
            vec![
                LengthClass::Forty,
                LengthClass::Twenty,
                LengthClass::Twenty,
                LengthClass::Forty
            ]
        );
    }

    #[test]
    fn test_container_block_ends_at_blank_line() {
        let text = "1 20 1000 1\n# Container list\n0 a 1\n\n1 b 1\n";
        let inst = parse_container_instance(text).unwrap();
        assert_eq!(inst.container_types, vec![1]);
    }

    #[test]
    fn test_parse_container_instance_without_block() {
        let inst = parse_container_instance("1 20 1000 1\n2 40 2000 1\n").unwrap();
        assert_eq!(inst.transport_types.len(), 2);
        assert!(inst.container_types.is_empty());
    }

    #[test]
    fn test_parse_container_instance_bad_type_id() {
        let text = "1 20 1000 1\n# Container\n0 a one\n";
        assert!(matches!(
            parse_container_instance(text),
            Err(LoadError::Parse(e)) if e.field == "type id" && e.line == 3
        ));
    }

    #[test]
    fn test_write_containers_csv_reads_back() {
        let containers = vec![
            Container::new(0, LengthClass::Forty, 25_000),
            Container::new(1, LengthClass::Twenty, 13_500),
        ];
        let mut buf = Vec::new();
        write_containers_csv(&containers, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("id,type,weight\n0,40ft,25000\n"));
        assert_eq!(parse_containers_csv(&text).unwrap(), containers);
    }
}
