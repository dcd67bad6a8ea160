use std::path::{Path, PathBuf};

/// Parameter dimensions of one experiment
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sweep {
    pub processes: Vec<u32>,
    pub threads: Vec<u32>,
    pub seeds: Vec<u64>,
    pub ks: Vec<u32>,
    pub epsilons: Vec<f64>,
}

/// One element of graphs × processes × threads × ks × epsilons × seeds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint<'a> {
    pub graph: &'a Path,
    pub processes: u32,
    pub threads: u32,
    pub k: u32,
    pub epsilon: f64,
    pub seed: u64,
}

impl Sweep {
    /// Iterate the cross product with graphs outermost and seeds innermost
    pub fn points<'a>(&'a self, graphs: &'a [PathBuf]) -> impl Iterator<Item = SweepPoint<'a>> + 'a {
        graphs.iter().flat_map(move |graph| {
            self.processes.iter().flat_map(move |&processes| {
                self.threads.iter().flat_map(move |&threads| {
                    self.ks.iter().flat_map(move |&k| {
                        self.epsilons.iter().flat_map(move |&epsilon| {
                            self.seeds.iter().map(move |&seed| SweepPoint {
                                graph: graph.as_path(),
                                processes,
                                threads,
                                k,
                                epsilon,
                                seed,
                            })
                        })
                    })
                })
            })
        })
    }

    /// Number of points for `graph_count` graphs
    pub fn size(&self, graph_count: usize) -> usize {
        graph_count
            * self.processes.len()
            * self.threads.len()
            * self.ks.len()
            * self.epsilons.len()
            * self.seeds.len()
    }
}

impl SweepPoint<'_> {
    /// `<stem>___P1x<p>x<t>_seed<s>_eps<e>_k<k>.log`
    pub fn log_file_name(&self) -> String {
        let stem = self
            .graph
            .file_stem()
            .unwrap_or(self.graph.as_os_str())
            .to_string_lossy();
        format!(
            "{stem}___P1x{}x{}_seed{}_eps{}_k{}.log",
            self.processes,
            self.threads,
            self.seed,
            format_real(self.epsilon),
            self.k
        )
    }
}

/// Render a real the way experiment logs have always been named
///
/// Fixed-point values keep a decimal point (`0.03`, `1.0`). Values below
/// `1e-4` or from `1e16` up use an exponent with an explicit sign and at
/// least two digits (`1e-05`, `2.5e+16`).
pub fn format_real(value: f64) -> String {
    let shortest = format!("{value:?}");
    match shortest.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => shortest,
    }
}
