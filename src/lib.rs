pub mod libmondai;
