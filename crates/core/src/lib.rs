//! Face-identity photo sorting.
//!
//! Walks a directory tree of photos, drops perceptual duplicates, extracts a
//! face signature per image, clusters signatures with DBSCAN, and copies each
//! photo into a per-identity output folder.

pub mod shared {
    pub mod constants;
    pub mod face_signature;
    pub mod frame;
    pub mod image_record;
    pub mod model_resolver;
    pub mod region;
}

pub mod walking {
    pub mod image_walker;
}

pub mod imaging {
    pub mod domain {
        pub mod image_loader;
    }
    pub mod infrastructure {
        pub mod image_file_loader;
    }
}

pub mod dedup {
    pub mod domain {
        pub mod duplicate_filter;
        pub mod fingerprinter;
    }
    pub mod infrastructure {
        pub mod average_hash_fingerprinter;
    }
}

pub mod detection {
    pub mod domain {
        pub mod face_detector;
        pub mod face_embedder;
        pub mod signature_extractor;
    }
    pub mod infrastructure;
}

pub mod clustering {
    pub mod domain {
        pub mod cluster_assignment;
        pub mod identity_clusterer;
        pub mod signature_batch;
    }
    pub mod infrastructure {
        pub mod dbscan_clusterer;
    }
}

pub mod distribution {
    pub mod distributor;
    pub mod output_layout;
    pub mod domain {
        pub mod file_sink;
    }
    pub mod infrastructure {
        pub mod fs_file_sink;
    }
}

pub mod pipeline {
    pub mod extraction_executor;
    pub mod load_stage;
    pub mod pipeline_logger;
    pub mod run_summary;
    pub mod sort_config;
    pub mod sort_faces_use_case;
    pub mod infrastructure {
        pub mod threaded_extraction_executor;
    }
}
