use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("failed to read density file '{path}'", path = path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed density row '{line}': {reason}")]
    MalformedRow { line: String, reason: String },

    #[error("density file contains no data rows")]
    Empty,

    #[error("density file has {rows} row(s), not divisible into frames of {chunks} chunk(s)")]
    RaggedFrames { rows: usize, chunks: usize },

    #[error("profiles have different chunk counts ({poly} vs {solv})")]
    ProfileLengthMismatch { poly: usize, solv: usize },
}

/// One spatial chunk of a density profile: chunk index, spatial coordinate,
/// and the averaged density in that chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityRow {
    pub chunk: usize,
    pub coord: f64,
    pub density: f64,
}

/// Time-resolved density profiles parsed from a LAMMPS `fix ave/chunk`
/// output file: one profile (frame) per dump timestep, each with the same
/// number of spatial chunks.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityProfiles {
    frames: Vec<Vec<DensityRow>>,
}

impl DensityProfiles {
    pub fn from_file(path: &Path) -> Result<Self, AnalysisError> {
        let content = std::fs::read_to_string(path).map_err(|source| AnalysisError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parses the ave/chunk text format: `#` comment headers, unindented
    /// per-timestep header lines, and indented data rows of
    /// `chunk coord ncount density`. Timestep headers are discarded; the
    /// frame boundaries are recovered from the recurring chunk numbering.
    pub fn parse(content: &str) -> Result<Self, AnalysisError> {
        let mut rows = Vec::new();
        for line in content.lines() {
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            // Data rows are indented; anything flush-left is a timestep header.
            if !line.starts_with(char::is_whitespace) {
                continue;
            }
            rows.push(parse_row(trimmed)?);
        }

        if rows.is_empty() {
            return Err(AnalysisError::Empty);
        }

        // The chunk numbering restarts at 1 on every frame.
        let chunks = rows
            .iter()
            .skip(1)
            .position(|row| row.chunk == 1)
            .map(|i| i + 1)
            .unwrap_or(rows.len());
        if rows.len() % chunks != 0 {
            return Err(AnalysisError::RaggedFrames {
                rows: rows.len(),
                chunks,
            });
        }

        let frames = rows.chunks(chunks).map(|frame| frame.to_vec()).collect();
        Ok(Self { frames })
    }

    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn chunks_per_frame(&self) -> usize {
        self.frames[0].len()
    }

    pub fn frames(&self) -> &[Vec<DensityRow>] {
        &self.frames
    }

    /// Averages the profiles over time, chunk by chunk.
    pub fn time_average(&self) -> Vec<DensityRow> {
        let chunks = self.chunks_per_frame();
        let n = self.frames.len() as f64;
        (0..chunks)
            .map(|i| DensityRow {
                chunk: self.frames[0][i].chunk,
                coord: self.frames.iter().map(|f| f[i].coord).sum::<f64>() / n,
                density: self.frames.iter().map(|f| f[i].density).sum::<f64>() / n,
            })
            .collect()
    }
}

fn parse_row(line: &str) -> Result<DensityRow, AnalysisError> {
    let malformed = |reason: &str| AnalysisError::MalformedRow {
        line: line.to_string(),
        reason: reason.to_string(),
    };

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(malformed("expected at least 4 columns"));
    }
    Ok(DensityRow {
        chunk: fields[0]
            .parse()
            .map_err(|_| malformed("chunk index is not an integer"))?,
        coord: fields[1]
            .parse()
            .map_err(|_| malformed("coordinate is not a number"))?,
        density: fields[3]
            .parse()
            .map_err(|_| malformed("density is not a number"))?,
    })
}

/// Sorption state of a brush/solvent system, judged from its time-averaged
/// density profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SorptionRegime {
    /// Overlap below threshold: the solvent stays out of the brush.
    NoSorption,
    /// Solvent accumulates on top of the brush surface.
    Adsorption,
    /// Solvent penetrates past the brush surface.
    Absorption,
}

/// Trapezoidal integral of the pointwise product of two equally-chunked
/// density profiles, with unit spacing. Measures how much the profiles
/// overlap in space. Profiles binned over different chunk counts are not
/// comparable and are rejected.
pub fn overlap_integral(poly: &[DensityRow], solv: &[DensityRow]) -> Result<f64, AnalysisError> {
    check_same_chunks(poly, solv)?;
    let product: Vec<f64> = poly
        .iter()
        .zip(solv)
        .map(|(p, s)| p.density * s.density)
        .collect();
    Ok(product
        .windows(2)
        .map(|w| (w[0] + w[1]) / 2.0)
        .sum())
}

fn check_same_chunks(poly: &[DensityRow], solv: &[DensityRow]) -> Result<(), AnalysisError> {
    if poly.len() != solv.len() {
        return Err(AnalysisError::ProfileLengthMismatch {
            poly: poly.len(),
            solv: solv.len(),
        });
    }
    Ok(())
}

/// Centered moving average with the given odd window size; endpoints shrink
/// the window to what is available.
fn smooth(values: &[f64], window: usize) -> Vec<f64> {
    let half = window / 2;
    (0..values.len())
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + half + 1).min(values.len());
            values[lo..hi].iter().sum::<f64>() / (hi - lo) as f64
        })
        .collect()
}

/// Index of the steepest descent of the (smoothed) polymer profile: the
/// brush surface.
pub fn inflection_index(profile: &[DensityRow], window: usize) -> usize {
    let densities: Vec<f64> = profile.iter().map(|r| r.density).collect();
    let smoothed = smooth(&densities, window);
    let gradient: Vec<f64> = smoothed
        .windows(2)
        .map(|w| w[1] - w[0])
        .collect();
    argmin(&gradient) + 1
}

/// Index of the highest point of the (smoothed) solvent profile.
pub fn peak_index(profile: &[DensityRow], window: usize) -> usize {
    let densities: Vec<f64> = profile.iter().map(|r| r.density).collect();
    argmax(&smooth(&densities, window))
}

const DEFAULT_SMOOTH_WINDOW: usize = 5;

/// Classifies the sorption regime from time-averaged polymer and solvent
/// profiles: no sorption when the overlap integral stays under the
/// threshold; otherwise adsorption when the solvent peak sits outside the
/// brush surface, absorption when it sits inside.
pub fn classify(
    poly_avg: &[DensityRow],
    solv_avg: &[DensityRow],
    overlap_threshold: f64,
) -> Result<SorptionRegime, AnalysisError> {
    if overlap_integral(poly_avg, solv_avg)? < overlap_threshold {
        return Ok(SorptionRegime::NoSorption);
    }
    if peak_index(solv_avg, DEFAULT_SMOOTH_WINDOW)
        > inflection_index(poly_avg, DEFAULT_SMOOTH_WINDOW)
    {
        Ok(SorptionRegime::Adsorption)
    } else {
        Ok(SorptionRegime::Absorption)
    }
}

fn argmin(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const AVE_CHUNK: &str = "\
# Chunk-averaged data for fix dens
# Timestep Number-of-chunks Total-count
# Chunk Coord1 Ncount density/number
1000 3 240
  1 0.25 100 1.0
  2 0.75 80 0.8
  3 1.25 20 0.2
2000 3 240
  1 0.25 100 0.8
  2 0.75 80 0.6
  3 1.25 20 0.4
";

    #[test]
    fn parses_frames_and_strips_headers() {
        let profiles = DensityProfiles::parse(AVE_CHUNK).unwrap();

        assert_eq!(profiles.num_frames(), 2);
        assert_eq!(profiles.chunks_per_frame(), 3);
        assert_eq!(profiles.frames()[0][0].chunk, 1);
        assert_eq!(profiles.frames()[1][2].density, 0.4);
    }

    #[test]
    fn time_average_is_the_chunkwise_mean() {
        let profiles = DensityProfiles::parse(AVE_CHUNK).unwrap();
        let avg = profiles.time_average();

        assert_eq!(avg.len(), 3);
        assert!((avg[0].density - 0.9).abs() < 1e-12);
        assert!((avg[1].density - 0.7).abs() < 1e-12);
        assert!((avg[2].density - 0.3).abs() < 1e-12);
        assert!((avg[0].coord - 0.25).abs() < 1e-12);
    }

    #[test]
    fn empty_file_is_rejected() {
        let err = DensityProfiles::parse("# only comments\n").unwrap_err();
        assert!(matches!(err, AnalysisError::Empty));
    }

    #[test]
    fn ragged_frames_are_rejected() {
        let truncated = "\
1000 3 240
  1 0.25 100 1.0
  2 0.75 80 0.8
  3 1.25 20 0.2
2000 3 240
  1 0.25 100 0.8
";
        let err = DensityProfiles::parse(truncated).unwrap_err();
        assert!(matches!(err, AnalysisError::RaggedFrames { rows: 4, chunks: 3 }));
    }

    #[test]
    fn malformed_row_is_reported_with_its_line() {
        let err = DensityProfiles::parse("1000 1 10\n  1 abc 10 0.5\n").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedRow { .. }));
    }

    #[test]
    fn from_file_reads_via_tempdir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("PolyDens.dat");
        std::fs::write(&path, AVE_CHUNK).unwrap();

        let profiles = DensityProfiles::from_file(&path).unwrap();
        assert_eq!(profiles.num_frames(), 2);
    }

    fn profile(densities: &[f64]) -> Vec<DensityRow> {
        densities
            .iter()
            .enumerate()
            .map(|(i, &density)| DensityRow {
                chunk: i + 1,
                coord: i as f64,
                density,
            })
            .collect()
    }

    #[test]
    fn overlap_integral_of_disjoint_profiles_is_zero() {
        let poly = profile(&[1.0, 1.0, 0.0, 0.0]);
        let solv = profile(&[0.0, 0.0, 1.0, 1.0]);
        assert_eq!(overlap_integral(&poly, &solv).unwrap(), 0.0);
    }

    #[test]
    fn overlap_integral_matches_trapezoid_by_hand() {
        let poly = profile(&[1.0, 1.0, 1.0]);
        let solv = profile(&[0.0, 1.0, 0.0]);
        // Product is [0, 1, 0]; trapezoids: 0.5 + 0.5.
        assert!((overlap_integral(&poly, &solv).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn mismatched_chunk_counts_are_rejected() {
        let poly = profile(&[1.0, 1.0, 0.5]);
        let solv = profile(&[0.0, 0.5, 1.0, 1.0]);

        let err = overlap_integral(&poly, &solv).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::ProfileLengthMismatch { poly: 3, solv: 4 }
        ));
        assert!(classify(&poly, &solv, 0.2).is_err());
    }

    #[test]
    fn inflection_sits_on_the_brush_edge() {
        // Flat brush, then a sharp drop around index 5.
        let poly = profile(&[1.0, 1.0, 1.0, 1.0, 0.9, 0.5, 0.1, 0.0, 0.0, 0.0]);
        let idx = inflection_index(&poly, 1);
        assert!((5..=6).contains(&idx), "got {idx}");
    }

    #[test]
    fn peak_finds_the_densest_chunk() {
        let solv = profile(&[0.0, 0.1, 0.2, 0.6, 1.0, 0.6, 0.1, 0.0, 0.0, 0.0]);
        assert_eq!(peak_index(&solv, 1), 4);
    }

    #[test]
    fn disjoint_profiles_classify_as_no_sorption() {
        let poly = profile(&[1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let solv = profile(&[0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        assert_eq!(classify(&poly, &solv, 0.2).unwrap(), SorptionRegime::NoSorption);
    }

    #[test]
    fn solvent_sitting_on_the_surface_is_adsorption() {
        let poly = profile(&[1.0, 1.0, 1.0, 1.0, 0.8, 0.4, 0.1, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let solv = profile(&[0.1, 0.1, 0.1, 0.1, 0.2, 0.4, 0.8, 1.2, 0.8, 0.3, 0.1, 0.0]);
        assert_eq!(classify(&poly, &solv, 0.2).unwrap(), SorptionRegime::Adsorption);
    }

    #[test]
    fn solvent_inside_the_brush_is_absorption() {
        let poly = profile(&[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.8, 0.4, 0.1, 0.0, 0.0, 0.0]);
        let solv = profile(&[0.3, 0.6, 1.0, 1.2, 1.0, 0.6, 0.3, 0.1, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(classify(&poly, &solv, 0.2).unwrap(), SorptionRegime::Absorption);
    }
}
