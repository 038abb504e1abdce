use criterion::{black_box, criterion_group, criterion_main, Criterion};

use reproj::{build_crs, transform, transform_batch, Crs, Point};

fn grid(n: usize, lon: (f64, f64), lat: (f64, f64)) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let t = i as f64 / n as f64;
            Point::new(lon.0 + t * (lon.1 - lon.0), lat.0 + t * (lat.1 - lat.0))
        })
        .collect()
}

fn bench_single_point(c: &mut Criterion) {
    let wgs84 = build_crs("EPSG:4326").unwrap();
    let cases: [(&str, Crs); 4] = [
        ("utm33", build_crs("EPSG:32633").unwrap()),
        ("webmerc", build_crs("EPSG:3857").unwrap()),
        (
            "lcc_datum_shift",
            build_crs(
                "+proj=lcc +lat_1=49 +lat_2=44 +lat_0=46.5 +lon_0=3 +x_0=700000 \
                 +y_0=6600000 +ellps=GRS80 +towgs84=0,0,0 +units=m",
            )
            .unwrap(),
        ),
        (
            "osgb36_tmerc",
            build_crs(
                "+proj=tmerc +lat_0=49 +lon_0=-2 +k=0.9996012717 +x_0=400000 \
                 +y_0=-100000 +datum=OSGB36 +units=m",
            )
            .unwrap(),
        ),
    ];

    for (name, dst) in &cases {
        c.bench_function(&format!("point_{name}"), |b| {
            b.iter(|| {
                let mut p = Point::new(black_box(1.5), black_box(50.5));
                transform(&wgs84, dst, &mut p).unwrap();
                black_box(p)
            });
        });
    }
}

fn bench_batch_throughput(c: &mut Criterion) {
    // Points/sec through the parallel batch path
    let n = 1_000_000_usize;
    let wgs84 = build_crs("EPSG:4326").unwrap();

    let utm = build_crs("EPSG:32633").unwrap();
    let template = grid(n, (12.0, 18.0), (45.0, 60.0));
    let mut points = template.clone();
    c.bench_function("batch_utm33_1M", |b| {
        b.iter(|| {
            points.copy_from_slice(&template);
            black_box(transform_batch(&wgs84, &utm, &mut points))
        });
    });

    let webmerc = build_crs("EPSG:3857").unwrap();
    let template = grid(n, (-170.0, 170.0), (-80.0, 80.0));
    let mut points = template.clone();
    c.bench_function("batch_webmerc_1M", |b| {
        b.iter(|| {
            points.copy_from_slice(&template);
            black_box(transform_batch(&wgs84, &webmerc, &mut points))
        });
    });
}

fn bench_batch_thread_scaling(c: &mut Criterion) {
    let wgs84 = build_crs("EPSG:4326").unwrap();
    let utm = build_crs("EPSG:32633").unwrap();
    let template = grid(100_000, (12.0, 18.0), (45.0, 60.0));
    let mut points = template.clone();

    for &threads in &[1, 2, 4, 8] {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap();

        c.bench_function(&format!("batch_threads_{threads}_utm33_100k"), |b| {
            b.iter(|| {
                points.copy_from_slice(&template);
                black_box(pool.install(|| transform_batch(&wgs84, &utm, &mut points)))
            });
        });
    }
}

fn bench_crs_parse(c: &mut Criterion) {
    let proj4 = "+proj=omerc +lat_0=4 +lonc=115 +alpha=53.31582047222222 +k=0.99984 \
                 +x_0=590476.87 +y_0=442857.65 +ellps=evrst69 +units=m +no_defs";
    c.bench_function("parse_proj4_omerc", |b| {
        b.iter(|| black_box(build_crs(black_box(proj4)).unwrap()))
    });

    let wkt = r#"PROJCS["OSGB 1936 / British National Grid",GEOGCS["OSGB 1936",DATUM["OSGB_1936",SPHEROID["Airy 1830",6377563.396,299.3249646]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433]],PROJECTION["Transverse_Mercator"],PARAMETER["latitude_of_origin",49],PARAMETER["central_meridian",-2],PARAMETER["scale_factor",0.9996012717],PARAMETER["false_easting",400000],PARAMETER["false_northing",-100000],UNIT["metre",1]]"#;
    c.bench_function("parse_wkt_bng", |b| {
        b.iter(|| black_box(build_crs(black_box(wkt)).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_single_point,
    bench_batch_throughput,
    bench_batch_thread_scaling,
    bench_crs_parse
);
criterion_main!(benches);
