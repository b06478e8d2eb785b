#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("ribbon_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use ribbon_engine::RibbonEngine;
    use ribbon_engine::geom::{OffsetMode, RibbonMesh};
    use ribbon_engine::scene::{RibbonOptions, Viewport};
    use std::fs::{self, File};
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};

    const USAGE: &str = r#"ribbon_cli (ribbon-engine)

USAGE:
  ribbon_cli build [options]
  ribbon_cli animate [options]

OPTIONS:
  --seed <n>             Seed for the random curve (default: 1)
  --segments <n>         Quads along the ribbon (default: 1000)
  --control-points <n>   Random control points (default: 7)
  --width <w>            Half-width of the ribbon (default: 0.1)
  --accumulated          Use the accumulated binormal offset
  --obj <path>           Write the ribbon as OBJ (build)
  --overwrite            Overwrite an existing OBJ file
  --frames <n>           Frames to simulate (animate, default: 10)
  -h, --help             Show this help
"#;

    struct BuildArgs {
        options: RibbonOptions,
        obj_path: Option<PathBuf>,
        overwrite: bool,
        frames: usize,
    }

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "build" => cmd_build(parse_options(&mut args)?),
            "animate" => cmd_animate(parse_options(&mut args)?),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn parse_options(args: &mut Args) -> Result<BuildArgs, String> {
        let mut parsed = BuildArgs {
            options: RibbonOptions {
                seed: Some(1),
                ..RibbonOptions::default()
            },
            obj_path: None,
            overwrite: false,
            frames: 10,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => parsed.options.seed = Some(args.number("--seed")?),
                "--segments" => parsed.options.segments = args.number("--segments")?,
                "--control-points" => {
                    parsed.options.control_points = args.number("--control-points")?;
                }
                "--width" => {
                    let w: f64 = args.number("--width")?;
                    parsed.options.half_widths = [-w, w];
                }
                "--accumulated" => parsed.options.offset_mode = OffsetMode::Accumulated,
                "--obj" => parsed.obj_path = Some(PathBuf::from(args.value("--obj")?)),
                "--overwrite" => parsed.overwrite = true,
                "--frames" => parsed.frames = args.number("--frames")?,
                "-h" | "--help" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        Ok(parsed)
    }

    fn build_engine(options: RibbonOptions) -> Result<RibbonEngine, String> {
        RibbonEngine::with_options(options, Viewport::new(1280, 720, 1.0))
            .map_err(|e| format!("build ribbon: {e}"))
    }

    fn cmd_build(args: BuildArgs) -> Result<(), String> {
        let engine = build_engine(args.options)?;
        let sketch = engine.sketch();

        if let Some(path) = args.obj_path.as_deref() {
            write_obj_file(path, sketch.mesh(), args.overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        let mesh = sketch.mesh();
        eprintln!(
            "ribbon: vertices={} triangles={} length={:.6} | {}",
            mesh.vertex_count(),
            mesh.triangle_count(),
            sketch.curve().length(),
            sketch.diagnostics().summary()
        );
        print!("{}", sketch.diagnostics());
        Ok(())
    }

    fn cmd_animate(args: BuildArgs) -> Result<(), String> {
        let mut engine = build_engine(args.options)?;
        let mut requested = engine.take_frame_request();

        println!("frame time front back");
        for frame in 1..=args.frames {
            if !requested {
                break;
            }
            requested = engine.frame();
            let [front, back] = engine.sketch().materials().offsets();
            println!("{frame} {:.6} {front:.6} {back:.6}", engine.time());
        }
        Ok(())
    }

    fn write_obj_file(path: &Path, mesh: &RibbonMesh, overwrite: bool) -> Result<(), String> {
        mesh.validate().map_err(|e| format!("mesh validation failed: {e}"))?;

        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }

        let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
        let mut w = BufWriter::new(file);
        let err = |e: std::io::Error| format!("write obj: {e}");

        writeln!(w, "# ribbon-engine ribbon_cli").map_err(err)?;
        writeln!(w, "o ribbon").map_err(err)?;

        for p in &mesh.positions {
            writeln!(w, "v {} {} {}", p[0], p[1], p[2]).map_err(err)?;
        }
        for uv in &mesh.uvs {
            writeln!(w, "vt {} {}", uv[0], uv[1]).map_err(err)?;
        }

        // Each group covers the whole strip. The front group draws back faces,
        // so its winding is reversed.
        for group in &mesh.groups {
            let name = if group.material_index == 0 { "front" } else { "back" };
            writeln!(w, "g {name}").map_err(err)?;
            writeln!(w, "usemtl {name}").map_err(err)?;
            for tri in mesh.indices[group.start..group.start + group.count].chunks_exact(3) {
                let (a, b, c) = (tri[0] + 1, tri[1] + 1, tri[2] + 1);
                if group.material_index == 0 {
                    writeln!(w, "f {c}/{c} {b}/{b} {a}/{a}").map_err(err)?;
                } else {
                    writeln!(w, "f {a}/{a} {b}/{b} {c}/{c}").map_err(err)?;
                }
            }
        }

        w.flush().map_err(err)
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }

        fn number<T: std::str::FromStr>(&mut self, flag: &str) -> Result<T, String> {
            let raw = self.value(flag)?;
            raw.parse()
                .map_err(|_| format!("invalid value `{raw}` for {flag}"))
        }
    }
}
